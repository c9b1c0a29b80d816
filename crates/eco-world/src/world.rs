//! The world: owns the map, the parameters and the random generator, and
//! advances everything one day at a time.

use crate::animal::{Animal, Step};
use crate::event::{Census, WorldEvent, WorldObserver};
use crate::map::WorldMap;
use crate::snapshot::MapSnapshot;
use eco_core::{AnimalId, Genotype, Position, Result, Terrain, WorldConfig};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument, trace};

pub struct World {
    map: WorldMap,
    config: WorldConfig,
    rng: ChaCha8Rng,
    day: u64,
    next_animal_id: u64,
}

/// Counts of what happened during one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayReport {
    pub day: u64,
    pub deaths: usize,
    pub moves: usize,
    pub plants_eaten: usize,
    pub births: usize,
    pub plants_grown: usize,
}

impl World {
    /// Build the map, put `start_animals` random animals on the centre cell
    /// and grow the first plants.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let map = WorldMap::new(&config.map)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut world = Self {
            map,
            config,
            rng,
            day: 0,
            next_animal_id: 0,
        };

        let center = Position::new(world.map.width() / 2, world.map.height() / 2);
        for _ in 0..world.config.start_animals {
            let genotype = Genotype::random(world.config.genotype_size, &mut world.rng);
            let energy = world.config.energy.start_energy;
            world.spawn_animal(center, genotype, energy)?;
        }

        let grown = world.grow_plants()?;
        debug!(
            animals = world.map.animal_count(),
            plants = grown,
            seed = world.config.seed,
            "World created"
        );

        Ok(world)
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub(crate) fn map_mut(&mut self) -> &mut WorldMap {
        &mut self.map
    }

    fn next_id(&mut self) -> AnimalId {
        let id = AnimalId(self.next_animal_id);
        self.next_animal_id += 1;
        id
    }

    /// Create an animal born today and put it on the map.
    pub fn spawn_animal(
        &mut self,
        position: Position,
        genotype: Genotype,
        energy: f64,
    ) -> Result<AnimalId> {
        if genotype.len() != self.config.genotype_size {
            return Err(eco_core::Error::InvalidGenotype(format!(
                "expected {} genes, got {}",
                self.config.genotype_size,
                genotype.len()
            )));
        }

        let id = self.next_id();
        let animal = Animal::new(id, position, genotype, energy, self.day, &mut self.rng)?;
        self.map.place_animal(animal)
    }

    /// Run the seven phases of one day in order.
    #[instrument(skip(self, observer), fields(day = self.day))]
    pub fn simulate_day(&mut self, observer: &mut impl WorldObserver) -> Result<DayReport> {
        let deaths = self.remove_dead_animals(observer)?;
        observer.on_event(&WorldEvent::Census(self.census()));

        let moves = self.make_decisions()?;
        let plants_eaten = self.feed_animals()?;
        let births = self.breed_animals(observer)?;
        let plants_grown = self.grow_plants()?;
        self.drain_energy();

        let report = DayReport {
            day: self.day,
            deaths,
            moves,
            plants_eaten,
            births,
            plants_grown,
        };

        self.day += 1;
        observer.on_event(&WorldEvent::DayAdvanced { day: self.day });

        trace!(?report, "Day complete");
        Ok(report)
    }

    /// Phase 1: remove every animal at or below zero energy.
    fn remove_dead_animals(&mut self, observer: &mut impl WorldObserver) -> Result<usize> {
        let dead: Vec<AnimalId> = self
            .map
            .animals()
            .filter(|animal| !animal.is_alive())
            .map(Animal::id)
            .collect();

        for &id in &dead {
            if let Some(animal) = self.map.animal(id) {
                observer.on_event(&WorldEvent::AnimalDied {
                    id,
                    position: animal.position(),
                    day: self.day,
                    birth_day: animal.birth_day(),
                    children: animal.children(),
                });
            }
            let animal = self.map.pop_animal(id)?;
            trace!(
                animal_id = %id,
                lifespan = self.day - animal.birth_day(),
                "Animal died"
            );
        }

        Ok(dead.len())
    }

    /// Phase 2: population summary of the animals alive at day start.
    pub fn census(&self) -> Census {
        let animals = self.map.animal_count();

        let (energy_sum, children_sum) = self
            .map
            .animals()
            .fold((0.0, 0u64), |(energy, children), animal| {
                (energy + animal.energy(), children + animal.children() as u64)
            });

        let mut genotype_counts: HashMap<&Genotype, usize> = HashMap::new();
        for animal in self.map.animals() {
            *genotype_counts.entry(animal.genotype()).or_insert(0) += 1;
        }
        let dominant_genotype = genotype_counts
            .into_iter()
            .max_by(|(a_genes, a_count), (b_genes, b_count)| {
                a_count.cmp(b_count).then_with(|| b_genes.cmp(a_genes))
            })
            .map(|(genotype, _)| genotype.clone());

        let (average_energy, average_children) = if animals > 0 {
            (
                energy_sum / animals as f64,
                children_sum as f64 / animals as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Census {
            day: self.day,
            animals,
            plants: self.map.plant_count(),
            average_energy,
            average_children,
            dominant_genotype,
        }
    }

    /// Phase 3: every animal alive at phase start acts once, in random order.
    fn make_decisions(&mut self) -> Result<usize> {
        let mut ids = self.map.animal_ids();
        ids.shuffle(&mut self.rng);

        let mut moves = 0;
        for id in ids {
            if let Step::Moved { .. } = self.map.decide(id, &mut self.rng)? {
                moves += 1;
            }
        }
        Ok(moves)
    }

    /// Phase 4: each plant with animals on it is shared equally by the
    /// animals tied for the highest energy, then removed.
    fn feed_animals(&mut self) -> Result<usize> {
        let plant_energy = self.config.energy.plant_energy;
        let plants: Vec<Position> = self.map.plants().collect();

        let mut eaten = 0;
        for pos in plants {
            let strongest: Vec<AnimalId> = {
                let animals = self.map.animals_at(pos);
                let Some(top) = animals.first().map(|a| a.energy()) else {
                    continue;
                };
                animals
                    .iter()
                    .take_while(|a| a.energy() == top)
                    .map(|a| a.id())
                    .collect()
            };

            let share = plant_energy / strongest.len() as f64;
            for id in &strongest {
                if let Some(animal) = self.map.animal_mut(*id) {
                    animal.add_energy(share);
                }
            }

            self.map.pop_plant(pos)?;
            eaten += 1;
            trace!(position = %pos, eaters = strongest.len(), share, "Plant eaten");
        }

        Ok(eaten)
    }

    /// Phase 5: on every cell hosting a possible parent, the two strongest
    /// animals try to breed.
    fn breed_animals(&mut self, observer: &mut impl WorldObserver) -> Result<usize> {
        let positions: BTreeSet<Position> = self
            .map
            .animals()
            .filter(|animal| animal.can_breed())
            .map(Animal::position)
            .collect();

        let child_energy = self.config.energy.start_energy;
        let mut births = 0;

        for pos in positions {
            let (first, second) = {
                let animals = self.map.animals_at(pos);
                match animals.as_slice() {
                    [first, second, ..] => (first.id(), second.id()),
                    _ => continue,
                }
            };

            let child_id = AnimalId(self.next_animal_id);
            if self.map.animal(child_id).is_some() {
                return Err(eco_core::Error::SlotOccupied(format!(
                    "animal {} is already on the map",
                    child_id
                )));
            }
            let day = self.day;
            let rng = &mut self.rng;
            let child = self.map.with_pair_mut(first, second, |a, b| {
                a.breed(b, child_id, child_energy, day, rng)
            })??;

            let Some(child) = child else {
                continue;
            };
            self.next_animal_id += 1;

            let offspring = self.map.place_animal(child)?;
            births += 1;

            observer.on_event(&WorldEvent::AnimalBorn {
                id: offspring,
                position: pos,
                day,
            });
            observer.on_event(&WorldEvent::AnimalsBred {
                parents: (first, second),
                offspring,
                day,
            });
            trace!(
                parent_a = %first,
                parent_b = %second,
                offspring = %offspring,
                position = %pos,
                "Animals bred"
            );
        }

        Ok(births)
    }

    /// Phase 6: grow up to the configured number of plants on bare jungle
    /// and steppe cells, picked uniformly at random.
    fn grow_plants(&mut self) -> Result<usize> {
        let mut jungle = Vec::new();
        let mut steppe = Vec::new();
        for cell in self.map.cells().filter(|cell| cell.is_empty()) {
            match cell.terrain() {
                Terrain::Jungle => jungle.push(cell.position()),
                Terrain::Steppe => steppe.push(cell.position()),
            }
        }

        jungle.shuffle(&mut self.rng);
        steppe.shuffle(&mut self.rng);

        let picked: Vec<Position> = jungle
            .into_iter()
            .take(self.config.growth.plants_jungle)
            .chain(steppe.into_iter().take(self.config.growth.plants_steppe))
            .collect();

        for &pos in &picked {
            self.map.place_plant(pos)?;
        }

        Ok(picked.len())
    }

    /// Phase 7: charge every animal the daily movement cost. Animals that
    /// drop to zero are swept at the start of the next day.
    fn drain_energy(&mut self) {
        let cost = self.config.energy.move_energy;
        for animal in self.map.animals_mut() {
            animal.remove_energy(cost);
        }
    }

    /// Read-only view of the whole map for renderers.
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot::capture(&self.map, self.day)
    }

    /// Log a population summary at info level.
    pub fn log_census(&self) {
        let census = self.census();
        info!(
            event = "population_census",
            day = census.day,
            animals = census.animals,
            plants = census.plants,
            average_energy = census.average_energy,
            average_children = census.average_children,
            dominant_genotype = %census
                .dominant_genotype
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            "Population census"
        );
    }
}
