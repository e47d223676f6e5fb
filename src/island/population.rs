//! Population hierarchy: archipelagos of islands of graded solutions.
//!
//! Islands are kept sorted ascending by grade between phases, so the head
//! of an island is its local best and the tail holds its worst members.

use super::types::{EvolveStrategy, Grade, SolutionGrade};
use super::workers::Worker;
use crate::diagnostics::{Diagnostics, LogLevel};
use crate::error::{EngineError, EngineResult};

/// A sub-population evolved independently between migrations.
#[derive(Debug, Clone)]
pub struct Island<S, G> {
    archipelago: usize,
    index: usize,
    members: Vec<SolutionGrade<S, G>>,
}

impl<S, G: PartialOrd> Island<S, G> {
    /// Creates an empty island at `index` within archipelago `archipelago`.
    pub fn new(archipelago: usize, index: usize) -> Self {
        Self {
            archipelago,
            index,
            members: Vec::new(),
        }
    }

    /// Creates an island from existing members, sorting them.
    pub fn with_members(archipelago: usize, index: usize, members: Vec<SolutionGrade<S, G>>) -> Self {
        let mut island = Self {
            archipelago,
            index,
            members,
        };
        island.sort();
        island
    }

    /// Index of the owning archipelago.
    pub fn archipelago(&self) -> usize {
        self.archipelago
    }

    /// Position of the island within its archipelago.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the island has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members, best first.
    pub fn members(&self) -> &[SolutionGrade<S, G>] {
        &self.members
    }

    /// Iterates over members, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, SolutionGrade<S, G>> {
        self.members.iter()
    }

    /// The local best.
    pub fn front(&self) -> Option<&SolutionGrade<S, G>> {
        self.members.first()
    }

    /// The `k` best members (fewer if the island is smaller).
    pub fn best(&self, k: usize) -> &[SolutionGrade<S, G>] {
        &self.members[..k.min(self.members.len())]
    }

    /// Stable ascending sort by grade.
    pub fn sort(&mut self) {
        self.members.sort_by(SolutionGrade::cmp_grade);
    }

    /// Whether members are in ascending grade order.
    pub fn is_sorted(&self) -> bool {
        self.members
            .windows(2)
            .all(|w| w[0].cmp_grade(&w[1]) != std::cmp::Ordering::Greater)
    }
}

impl<S: Clone, G: Clone + PartialOrd> Island<S, G> {
    /// Overwrites the worst members with `immigrants`, then re-sorts.
    ///
    /// Pairing runs tail to head: the worst slot receives `immigrants[0]`,
    /// the second-worst `immigrants[1]`, and so on. Extra immigrants beyond
    /// the island size are ignored.
    pub fn replace_worst(&mut self, immigrants: &[SolutionGrade<S, G>]) {
        let len = self.members.len();
        for (offset, immigrant) in immigrants.iter().take(len).enumerate() {
            self.members[len - 1 - offset] = immigrant.clone();
        }
        self.sort();
    }
}

impl<S, G> Island<S, G>
where
    S: Clone + Send + Sync + std::fmt::Debug,
    G: Grade,
{
    /// Fills the island with `size` freshly generated and evaluated solutions.
    pub fn fill<St>(
        &mut self,
        worker: &mut Worker<St>,
        size: usize,
        diagnostics: &Diagnostics,
    ) -> EngineResult<()>
    where
        St: EvolveStrategy<Solution = S, Grade = G>,
    {
        self.members.clear();
        self.members.reserve(size);
        for _ in 0..size {
            let solution = worker
                .strategy
                .generate_solution(worker.rng.operator())
                .map_err(EngineError::strategy)?;
            let grade = worker
                .strategy
                .evaluate_solution(&solution)
                .map_err(EngineError::strategy)?;
            diagnostics.emit(LogLevel::Solution, || {
                format!(
                    "archipelago {} island {}: generated {:?} grade {:?}",
                    self.archipelago, self.index, solution, grade
                )
            });
            self.members.push(SolutionGrade::new(solution, grade));
        }
        self.sort();
        Ok(())
    }

    /// Runs one generation of crossover, mutation and truncation selection.
    ///
    /// Only the members present at the start are used as parents. Every
    /// offspring is evaluated and appended; the grown island is then sorted
    /// and truncated back to its initial size, keeping the best.
    pub fn evolve<St>(
        &mut self,
        worker: &mut Worker<St>,
        crossover_rate: f64,
        mutation_rate: f64,
        diagnostics: &Diagnostics,
    ) -> EngineResult<()>
    where
        St: EvolveStrategy<Solution = S, Grade = G>,
    {
        let size = self.members.len();
        for i in 0..size {
            if worker.rng.draw_probability() <= crossover_rate {
                let j = worker.rng.draw_index(size);
                if j != i {
                    let child = worker
                        .strategy
                        .crossover(
                            &self.members[i].solution,
                            &self.members[j].solution,
                            worker.rng.operator(),
                        )
                        .map_err(EngineError::strategy)?;
                    self.push_offspring(worker, child, "crossover", diagnostics)?;
                }
            }

            if worker.rng.draw_probability() <= mutation_rate {
                let child = worker
                    .strategy
                    .mutation(&self.members[i].solution, worker.rng.operator())
                    .map_err(EngineError::strategy)?;
                self.push_offspring(worker, child, "mutation", diagnostics)?;
            }
        }

        self.sort();
        self.members.truncate(size);

        if let Some(front) = self.front() {
            diagnostics.emit(LogLevel::Island, || {
                format!(
                    "archipelago {} island {}: best grade {:?}",
                    self.archipelago, self.index, front.grade
                )
            });
        }
        Ok(())
    }

    fn push_offspring<St>(
        &mut self,
        worker: &mut Worker<St>,
        child: S,
        origin: &str,
        diagnostics: &Diagnostics,
    ) -> EngineResult<()>
    where
        St: EvolveStrategy<Solution = S, Grade = G>,
    {
        let grade = worker
            .strategy
            .evaluate_solution(&child)
            .map_err(EngineError::strategy)?;
        diagnostics.emit(LogLevel::Solution, || {
            format!(
                "archipelago {} island {}: {} child {:?} grade {:?}",
                self.archipelago, self.index, origin, child, grade
            )
        });
        self.members.push(SolutionGrade::new(child, grade));
        Ok(())
    }
}

/// A group of islands sharing periodic migration.
#[derive(Debug, Clone)]
pub struct Archipelago<S, G> {
    index: usize,
    islands: Vec<Island<S, G>>,
}

impl<S, G: PartialOrd> Archipelago<S, G> {
    /// Creates an archipelago of `island_count` empty islands.
    pub fn new(index: usize, island_count: usize) -> Self {
        Self {
            index,
            islands: (0..island_count).map(|i| Island::new(index, i)).collect(),
        }
    }

    /// Creates an archipelago from existing islands.
    pub fn with_islands(index: usize, islands: Vec<Island<S, G>>) -> Self {
        Self { index, islands }
    }

    /// Position of the archipelago in the engine.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of islands.
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    /// Whether the archipelago has no islands.
    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    /// The islands, in ring order.
    pub fn islands(&self) -> &[Island<S, G>] {
        &self.islands
    }

    /// Mutable access to the islands.
    pub fn islands_mut(&mut self) -> &mut [Island<S, G>] {
        &mut self.islands
    }

    /// The representative island used for archipelago migration.
    pub fn lead(&self) -> Option<&Island<S, G>> {
        self.islands.first()
    }

    /// Mutable access to the representative island.
    pub fn lead_mut(&mut self) -> Option<&mut Island<S, G>> {
        self.islands.first_mut()
    }

    /// Index of the island holding the archipelago's best member.
    ///
    /// Only island heads are inspected. Ties go to the lowest index.
    pub fn best_island(&self) -> Option<usize> {
        self.islands
            .iter()
            .enumerate()
            .filter_map(|(i, island)| island.front().map(|front| (i, front)))
            .min_by(|(_, a), (_, b)| a.cmp_grade(b))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island(values: &[i64]) -> Island<i64, i64> {
        Island::with_members(
            0,
            0,
            values.iter().map(|&v| SolutionGrade::new(v, v)).collect(),
        )
    }

    fn grades(island: &Island<i64, i64>) -> Vec<i64> {
        island.iter().map(|m| m.grade).collect()
    }

    #[test]
    fn test_with_members_sorts() {
        let island = island(&[4, 3, 2, 1]);
        assert_eq!(grades(&island), vec![1, 2, 3, 4]);
        assert!(island.is_sorted());
        assert_eq!(island.front().map(|m| m.grade), Some(1));
    }

    #[test]
    fn test_best_is_head_slice() {
        let island = island(&[5, 1, 3]);
        assert_eq!(island.best(2).iter().map(|m| m.grade).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(island.best(10).len(), 3);
        assert!(island.best(0).is_empty());
    }

    #[test]
    fn test_replace_worst_pairs_tail_to_head() {
        let mut target = island(&[10, 20, 30, 40]);
        let source = island(&[1, 2, 3]);

        target.replace_worst(source.best(2));

        // 40 <- 1, 30 <- 2, then re-sorted
        assert_eq!(grades(&target), vec![1, 2, 10, 20]);
        assert!(target.is_sorted());
    }

    #[test]
    fn test_replace_worst_ignores_extra_immigrants() {
        let mut target = island(&[10, 20]);
        let source = island(&[1, 2, 3, 4]);
        target.replace_worst(source.members());
        assert_eq!(grades(&target), vec![1, 2]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_grades() {
        let mut island = Island::with_members(
            0,
            0,
            vec![
                SolutionGrade::new("b", 1),
                SolutionGrade::new("a", 0),
                SolutionGrade::new("c", 1),
            ],
        );
        island.sort();
        let order: Vec<_> = island.iter().map(|m| m.solution).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_archipelago_best_island() {
        let arch = Archipelago::with_islands(
            0,
            vec![island(&[5, 6]), island(&[2, 9]), island(&[2, 3])],
        );
        assert_eq!(arch.best_island(), Some(1));
        assert_eq!(arch.lead().map(|i| grades(i)), Some(vec![5, 6]));
        assert_eq!(arch.len(), 3);
    }

    #[test]
    fn test_new_archipelago_has_empty_islands() {
        let arch: Archipelago<i64, i64> = Archipelago::new(2, 3);
        assert_eq!(arch.index(), 2);
        assert!(arch.islands().iter().all(Island::is_empty));
        assert_eq!(arch.islands()[1].index(), 1);
        assert_eq!(arch.islands()[1].archipelago(), 2);
        assert_eq!(arch.best_island(), None);
    }
}
