//! Visiting order for a single worker's stops.
//!
//! Small instances are solved exactly by enumerating every permutation;
//! larger ones use the nearest-neighbor heuristic so a request stays well
//! under a second. Tours start and end at the worker's home.
//!
//! Ties are resolved by keeping the first candidate encountered: the first
//! minimal permutation in lexicographic index order, or the lowest-index
//! stop among equally near ones.

use itertools::Itertools;

use crate::model::Coordinate;
use crate::traits::TravelMetricProvider;

/// A closed tour from home through every stop and back.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour<Id> {
    pub order: Vec<Id>,
    pub total_distance_km: f64,
}

impl<Id> Tour<Id> {
    fn empty() -> Self {
        Self {
            order: Vec::new(),
            total_distance_km: 0.0,
        }
    }
}

/// Picks exhaustive search for up to `brute_force_limit` stops and
/// nearest neighbor above that.
pub fn solve<Id, M>(
    home: Coordinate,
    stops: &[(Id, Coordinate)],
    metric: &M,
    brute_force_limit: usize,
) -> Tour<Id>
where
    Id: Clone,
    M: TravelMetricProvider + ?Sized,
{
    if stops.len() <= brute_force_limit {
        brute_force(home, stops, metric)
    } else {
        nearest_neighbor(home, stops, metric)
    }
}

/// Exact shortest tour by enumerating all permutations.
pub fn brute_force<Id, M>(home: Coordinate, stops: &[(Id, Coordinate)], metric: &M) -> Tour<Id>
where
    Id: Clone,
    M: TravelMetricProvider + ?Sized,
{
    if stops.is_empty() {
        return Tour::empty();
    }

    let legs = LegMatrix::build(home, stops, metric);
    let mut best: Option<(Vec<usize>, f64)> = None;

    for perm in (0..stops.len()).permutations(stops.len()) {
        let distance = legs.tour_length(&perm);
        let improves = match &best {
            Some((_, best_distance)) => distance < *best_distance,
            None => true,
        };
        if improves {
            best = Some((perm, distance));
        }
    }

    match best {
        Some((perm, total_distance_km)) => Tour {
            order: perm.iter().map(|&idx| stops[idx].0.clone()).collect(),
            total_distance_km,
        },
        None => Tour::empty(),
    }
}

/// Greedy tour: always move to the closest stop not yet visited.
pub fn nearest_neighbor<Id, M>(home: Coordinate, stops: &[(Id, Coordinate)], metric: &M) -> Tour<Id>
where
    Id: Clone,
    M: TravelMetricProvider + ?Sized,
{
    if stops.is_empty() {
        return Tour::empty();
    }

    let legs = LegMatrix::build(home, stops, metric);
    let mut visited = vec![false; stops.len()];
    let mut order = Vec::with_capacity(stops.len());
    let mut total_distance_km = 0.0;
    let mut current = LegMatrix::HOME;

    for _ in 0..stops.len() {
        let mut nearest: Option<(usize, f64)> = None;
        for idx in (0..stops.len()).filter(|&idx| !visited[idx]) {
            let distance = legs.between(current, LegMatrix::stop(idx));
            let closer = match nearest {
                Some((_, nearest_distance)) => distance < nearest_distance,
                None => true,
            };
            if closer {
                nearest = Some((idx, distance));
            }
        }

        let Some((idx, distance)) = nearest else {
            break;
        };
        visited[idx] = true;
        order.push(idx);
        total_distance_km += distance;
        current = LegMatrix::stop(idx);
    }

    total_distance_km += legs.between(current, LegMatrix::HOME);

    Tour {
        order: order.iter().map(|&idx| stops[idx].0.clone()).collect(),
        total_distance_km,
    }
}

/// Tour distances between home (index 0) and every stop (index `i + 1`),
/// looked up once per solve.
struct LegMatrix {
    km: Vec<Vec<f64>>,
}

impl LegMatrix {
    const HOME: usize = 0;

    fn stop(idx: usize) -> usize {
        idx + 1
    }

    fn build<Id, M>(home: Coordinate, stops: &[(Id, Coordinate)], metric: &M) -> Self
    where
        M: TravelMetricProvider + ?Sized,
    {
        let points: Vec<Coordinate> = std::iter::once(home)
            .chain(stops.iter().map(|(_, location)| *location))
            .collect();

        let km = points
            .iter()
            .map(|&from| {
                points
                    .iter()
                    .map(|&to| metric.tour_km(from, to))
                    .collect()
            })
            .collect();

        Self { km }
    }

    fn between(&self, from: usize, to: usize) -> f64 {
        self.km[from][to]
    }

    fn tour_length(&self, perm: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut current = Self::HOME;
        for &idx in perm {
            total += self.between(current, Self::stop(idx));
            current = Self::stop(idx);
        }
        total + self.between(current, Self::HOME)
    }
}
