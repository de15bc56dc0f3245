use grid_adventure_core::{
    Movement, Position,
    config::GameConfig,
    game::{Game, Input},
    level::{self, LevelLayout},
    occupant::OccupantKind,
    world::World,
};

fn world_with(level: &str) -> World {
    let mut world = World::new(&GameConfig::default());
    world.load(&LevelLayout::parse("test", level));
    world
}

fn kinds_at(world: &World, position: Position) -> Vec<OccupantKind> {
    world.occupants_at(position).map(|o| o.kind).collect()
}

fn count(world: &World, kind: OccupantKind) -> usize {
    world.occupants().filter(|o| o.kind == kind).count()
}

#[test]
fn walls_block_the_player() {
    let mut world = world_with("Sx");
    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(0, 0));
    assert!(world.is_coherent());
}

#[test]
fn grid_edges_block_the_player() {
    let mut world = world_with("S");
    assert!(!world.move_player(Movement::Left));
    assert!(!world.move_player(Movement::Down));
    assert_eq!(world.player_position(), Position::new(0, 0));
}

#[test]
fn picking_up_keys_counts_and_reports() {
    let mut world = world_with("Skk");

    assert!(world.move_player(Movement::Right));
    assert_eq!(world.keys(), 1);
    assert_eq!(count(&world, OccupantKind::Consumable), 1);
    assert_eq!(world.texts().messages().len(), 1);
    assert_eq!(
        world.texts().messages()[0].text(),
        "Picked up a key, you now have 1 key"
    );

    assert!(world.move_player(Movement::Right));
    assert_eq!(world.keys(), 2);
    assert_eq!(count(&world, OccupantKind::Consumable), 0);
    assert_eq!(world.texts().messages().len(), 2);
    assert_eq!(
        world.texts().messages()[1].text(),
        "Picked up a key, you now have 2 keys"
    );
    assert_eq!(kinds_at(&world, Position::new(2, 0)), vec![OccupantKind::Player]);
}

#[test]
fn doors_need_a_key() {
    let mut world = world_with("SD");
    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(0, 0));
    assert_eq!(count(&world, OccupantKind::Door), 1);
}

#[test]
fn doors_consume_a_key() {
    let mut world = world_with("SkDD");
    assert!(world.move_player(Movement::Right));
    assert!(world.move_player(Movement::Right));
    assert_eq!(world.keys(), 0);
    assert_eq!(count(&world, OccupantKind::Door), 1);
    assert_eq!(world.player_position(), Position::new(2, 0));

    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(2, 0));
}

#[test]
fn pushed_blocks_do_not_open_doors() {
    let mut world = world_with("SkoD");
    assert!(world.move_player(Movement::Right));
    assert_eq!(world.keys(), 1);
    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.keys(), 1);
    assert_eq!(count(&world, OccupantKind::Door), 1);
}

#[test]
fn single_block_advances_with_the_player() {
    let mut world = world_with("So.");
    assert!(world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(1, 0));
    assert_eq!(kinds_at(&world, Position::new(2, 0)), vec![OccupantKind::Movable]);
    assert!(kinds_at(&world, Position::new(0, 0)).is_empty());
    assert!(world.is_coherent());
}

#[test]
fn blocked_chain_moves_nothing() {
    let mut world = world_with("Sooox");
    let before: Vec<Position> = world.occupants().map(|o| o.position).collect();
    assert!(!world.move_player(Movement::Right));
    let after: Vec<Position> = world.occupants().map(|o| o.position).collect();
    assert_eq!(before, after);
    assert!(world.is_coherent());
}

#[test]
fn chain_against_grid_edge_moves_nothing() {
    let config = GameConfig {
        grid_width: 4,
        grid_height: 1,
        ..GameConfig::default()
    };
    let mut world = World::new(&config);
    world.load(&LevelLayout::parse("edge", "Sooo"));
    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(0, 0));
}

#[test]
fn free_chain_moves_together() {
    let mut world = world_with("Soo.");
    assert!(world.move_player(Movement::Right));
    assert_eq!(kinds_at(&world, Position::new(2, 0)), vec![OccupantKind::Movable]);
    assert_eq!(kinds_at(&world, Position::new(3, 0)), vec![OccupantKind::Movable]);
}

#[test]
fn clutter_is_walkable_but_stops_blocks() {
    let mut world = world_with("S^");
    assert!(world.move_player(Movement::Right));
    assert_eq!(
        kinds_at(&world, Position::new(1, 0)),
        vec![OccupantKind::Clutter, OccupantKind::Player]
    );

    let mut world = world_with("So^");
    assert!(!world.move_player(Movement::Right));
    assert_eq!(world.player_position(), Position::new(0, 0));
}

#[test]
fn up_increases_y() {
    let mut world = world_with("S\n.");
    assert!(world.move_player(Movement::Up));
    assert_eq!(world.player_position(), Position::new(0, 1));
    assert!(world.move_player(Movement::Down));
    assert_eq!(world.player_position(), Position::new(0, 0));
}

#[test]
fn reloading_replaces_every_occupant() {
    let mut game = Game::new(&GameConfig::default(), level::builtin());
    assert!(game.handle_input(Input::Move(Movement::Right)));
    let boxes_before = game
        .world()
        .occupants()
        .filter(|o| o.kind == OccupantKind::Movable)
        .count();
    assert_eq!(boxes_before, 3);

    assert!(game.handle_input(Input::SelectLevel(1)));
    let world = game.world();
    assert_eq!(world.player_position(), Position::new(0, 5));
    assert_eq!(count(world, OccupantKind::Immovable), 0);
    assert_eq!(count(world, OccupantKind::Door), 0);
    assert_eq!(count(world, OccupantKind::Movable), 5);
    assert!(world.is_coherent());

    assert!(game.handle_input(Input::SelectLevel(0)));
    assert_eq!(game.world().player_position(), Position::new(0, 1));
    assert_eq!(count(game.world(), OccupantKind::Movable), 3);
}

#[test]
fn level_without_start_uses_origin() {
    let world = world_with("..o\nx..");
    assert_eq!(world.player_position(), Position::new(0, 0));
}

#[test]
fn hard_level_box_can_be_pushed_along_the_corridor() {
    let mut game = Game::new(&GameConfig::default(), vec![level::hard()]);

    assert!(game.handle_input(Input::Move(Movement::Right)));
    assert!(game.handle_input(Input::Move(Movement::Right)));
    // Box at (3, 1) slides to (4, 1).
    assert!(game.handle_input(Input::Move(Movement::Right)));
    assert_eq!(game.world().player_position(), Position::new(3, 1));
    assert_eq!(
        kinds_at(game.world(), Position::new(4, 1)),
        vec![OccupantKind::Movable]
    );

    // Two more pushes put the box against the wall at (7, 1).
    assert!(game.handle_input(Input::Move(Movement::Right)));
    assert!(game.handle_input(Input::Move(Movement::Right)));
    assert!(!game.handle_input(Input::Move(Movement::Right)));
    assert_eq!(game.world().player_position(), Position::new(5, 1));
    assert!(game.world().is_coherent());
}
