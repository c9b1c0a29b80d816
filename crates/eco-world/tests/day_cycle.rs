use eco_core::{BoundaryPolicy, EnergyConfig, GrowthConfig, MapConfig, Position, WorldConfig};
use eco_world::{LineageTracker, World, WorldEvent, WorldMap, WorldStatistics};
use std::collections::BTreeSet;

fn config(boundary: BoundaryPolicy, seed: u64) -> WorldConfig {
    WorldConfig {
        seed,
        start_animals: 30,
        genotype_size: 32,
        map: MapConfig {
            width: 24,
            height: 16,
            jungle_width: 8,
            jungle_height: 6,
            boundary,
        },
        energy: EnergyConfig {
            start_energy: 40.0,
            move_energy: 1.0,
            plant_energy: 25.0,
        },
        growth: GrowthConfig {
            plants_jungle: 4,
            plants_steppe: 6,
        },
    }
}

fn assert_consistent(map: &WorldMap) {
    let mut listed = BTreeSet::new();
    for cell in map.cells() {
        for id in cell.animal_ids() {
            let animal = map.animal(*id).expect("cell lists an unknown animal");
            assert_eq!(animal.position(), cell.position());
            assert!(listed.insert(*id), "animal {} listed twice", id);
        }
        assert_eq!(cell.has_plant(), map.has_plant(cell.position()));
    }
    assert_eq!(listed.len(), map.animal_count());

    let plant_cells = map.cells().filter(|cell| cell.has_plant()).count();
    assert_eq!(plant_cells, map.plant_count());

    for animal in map.animals() {
        let pos = animal.position();
        assert!(pos.x >= 0 && pos.x < map.width());
        assert!(pos.y >= 0 && pos.y < map.height());
    }
}

#[test]
fn test_map_stays_consistent_over_many_days() {
    for boundary in [BoundaryPolicy::Clamped, BoundaryPolicy::Wrapped] {
        let mut world = World::new(config(boundary, 11)).unwrap();
        assert_consistent(world.map());

        for _ in 0..150 {
            world.simulate_day(&mut ()).unwrap();
            assert_consistent(world.map());
        }
        assert_eq!(world.day(), 150);
    }
}

#[test]
fn test_statistics_follow_the_run() {
    let mut world = World::new(config(BoundaryPolicy::Wrapped, 5)).unwrap();
    let mut stats = WorldStatistics::new();
    let mut births = 0;
    let mut deaths = 0;

    for _ in 0..80 {
        let report = world.simulate_day(&mut stats).unwrap();
        births += report.births as u64;
        deaths += report.deaths as u64;
    }

    assert_eq!(stats.days(), 80);
    assert_eq!(stats.history().len(), 80);
    assert_eq!(stats.births(), births);
    assert_eq!(stats.deaths(), deaths);

    for (day, row) in stats.history().iter().enumerate() {
        assert_eq!(row.day, day as u64);
    }

    let summary = stats.summary();
    assert_eq!(summary.days, 80);
    assert!(summary.average_animals > 0.0);
}

#[test]
fn test_lineage_tracker_sees_offspring() {
    let mut world = World::new(config(BoundaryPolicy::Wrapped, 2)).unwrap();
    let root = world.map().animal_ids()[0];
    let mut observers = (LineageTracker::new(root), Vec::<WorldEvent>::new());

    for _ in 0..40 {
        world.simulate_day(&mut observers).unwrap();
    }

    let (tracker, events) = observers;
    let expected_children = events
        .iter()
        .filter(|e| matches!(e, WorldEvent::AnimalsBred { parents: (a, b), .. } if *a == root || *b == root))
        .count();
    assert_eq!(tracker.children(), expected_children);
    assert!(tracker.descendants() >= tracker.children());

    let root_died = events
        .iter()
        .find_map(|e| match e {
            WorldEvent::AnimalDied { id, day, .. } if *id == root => Some(*day),
            _ => None,
        });
    assert_eq!(tracker.death_day(), root_died);
}

#[test]
fn test_different_seeds_diverge() {
    let mut first = World::new(config(BoundaryPolicy::Wrapped, 1)).unwrap();
    let mut second = World::new(config(BoundaryPolicy::Wrapped, 2)).unwrap();
    for _ in 0..20 {
        first.simulate_day(&mut ()).unwrap();
        second.simulate_day(&mut ()).unwrap();
    }
    assert_ne!(first.snapshot(), second.snapshot());
}

#[test]
fn test_offspring_spawns_on_parents_cell() {
    let mut cfg = config(BoundaryPolicy::Clamped, 3);
    cfg.start_animals = 0;
    cfg.growth = GrowthConfig {
        plants_jungle: 0,
        plants_steppe: 0,
    };
    let mut world = World::new(cfg).unwrap();

    // rotation-only genes keep both parents on their cell
    let genotype = eco_core::Genotype::new(vec![2; 32], 32).unwrap();
    let pos = Position::new(12, 8);
    world.spawn_animal(pos, genotype.clone(), 40.0).unwrap();
    world.spawn_animal(pos, genotype, 40.0).unwrap();

    let mut events = Vec::new();
    let report = world.simulate_day(&mut events).unwrap();
    assert_eq!(report.moves, 0);
    assert_eq!(report.births, 1);

    let (child_id, birth_pos) = events
        .iter()
        .find_map(|e| match e {
            WorldEvent::AnimalBorn { id, position, .. } => Some((*id, *position)),
            _ => None,
        })
        .expect("parents with full energy breed");
    assert_eq!(birth_pos, pos);

    let child = world.map().animal(child_id).unwrap();
    assert_eq!(child.position(), pos);
    assert_eq!(child.energy(), 39.0);
    assert_eq!(child.genotype().genes(), &[2; 32]);

    let animals = world.map().animals_at(pos);
    assert_eq!(animals.len(), 3);
    assert_eq!(animals[0].id(), child_id);
    assert_eq!(animals[1].energy(), 19.0);
}
