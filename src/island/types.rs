//! Core trait definitions for the island-model engine.
//!
//! [`EvolveStrategy`] is the contract between the generic engine and a
//! domain-specific problem; [`SolutionGrade`] is the unit stored in every
//! island.

use rand::Rng;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Marker trait for grade (fitness) values.
///
/// Lower grade is considered better (minimization). Grades only need a
/// partial order; incomparable values (such as NaN) are treated as equal
/// when islands are sorted.
///
/// Built-in implementations exist for the primitive float and integer types.
/// For maximization problems, negate the grade or use a wrapper type.
pub trait Grade: PartialOrd + Clone + Send + Sync + Debug + 'static {
    /// Converts the grade to `f64` for the grade history.
    fn to_f64(&self) -> f64;
}

macro_rules! impl_grade {
    ($($t:ty),*) => {
        $(
            impl Grade for $t {
                fn to_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_grade!(f64, f32, i32, i64, u32, u64, usize);

/// A candidate solution paired with its grade.
///
/// Comparisons look at the grade only: `a < b` exactly when
/// `a.grade < b.grade`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionGrade<S, G> {
    /// The candidate solution.
    pub solution: S,
    /// Its grade, as returned by [`EvolveStrategy::evaluate_solution`].
    pub grade: G,
}

impl<S, G> SolutionGrade<S, G> {
    /// Pairs a solution with its grade.
    pub fn new(solution: S, grade: G) -> Self {
        Self { solution, grade }
    }
}

impl<S, G: PartialOrd> SolutionGrade<S, G> {
    /// Total ordering used for sorting; incomparable grades are equal.
    pub fn cmp_grade(&self, other: &Self) -> Ordering {
        self.grade
            .partial_cmp(&other.grade)
            .unwrap_or(Ordering::Equal)
    }
}

impl<S, G: PartialEq> PartialEq for SolutionGrade<S, G> {
    fn eq(&self, other: &Self) -> bool {
        self.grade == other.grade
    }
}

impl<S, G: PartialOrd> PartialOrd for SolutionGrade<S, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.grade.partial_cmp(&other.grade)
    }
}

/// User-supplied evolution operators.
///
/// The engine clones the prototype once per worker, so each clone may keep
/// private scratch state behind `&mut self` without any synchronization.
/// Operators that need randomness receive the worker's own generator.
///
/// Any error returned by an operator aborts the current generation and is
/// propagated to the caller as [`EngineError::Strategy`](crate::error::EngineError::Strategy).
/// Infallible strategies can use `type Error = std::convert::Infallible`.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_archipelago::island::EvolveStrategy;
///
/// #[derive(Clone)]
/// struct Sphere;
///
/// impl EvolveStrategy for Sphere {
///     type Solution = Vec<f64>;
///     type Grade = f64;
///     type Error = std::convert::Infallible;
///
///     fn generate_solution<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<f64>, Self::Error> {
///         Ok((0..3).map(|_| rng.random_range(-5.0..5.0)).collect())
///     }
///
///     fn evaluate_solution(&mut self, x: &Vec<f64>) -> Result<f64, Self::Error> {
///         Ok(x.iter().map(|v| v * v).sum())
///     }
///
///     fn crossover<R: Rng>(&mut self, a: &Vec<f64>, b: &Vec<f64>, _rng: &mut R) -> Result<Vec<f64>, Self::Error> {
///         Ok(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
///     }
///
///     fn mutation<R: Rng>(&mut self, x: &Vec<f64>, rng: &mut R) -> Result<Vec<f64>, Self::Error> {
///         let mut child = x.clone();
///         let i = rng.random_range(0..child.len());
///         child[i] += rng.random_range(-0.5..0.5);
///         Ok(child)
///     }
/// }
/// ```
pub trait EvolveStrategy: Clone + Send {
    /// The solution representation. Opaque to the engine.
    type Solution: Clone + Send + Sync + Debug;

    /// The grade type.
    type Grade: Grade;

    /// Error raised by the operators.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produces one fresh candidate.
    fn generate_solution<R: Rng>(&mut self, rng: &mut R) -> Result<Self::Solution, Self::Error>;

    /// Grades a solution. Lower is better.
    ///
    /// Two evaluations of equal solutions should give equal grades, since
    /// stagnation is detected by grade equality.
    fn evaluate_solution(&mut self, solution: &Self::Solution) -> Result<Self::Grade, Self::Error>;

    /// Combines two parents into one child.
    fn crossover<R: Rng>(
        &mut self,
        first: &Self::Solution,
        second: &Self::Solution,
        rng: &mut R,
    ) -> Result<Self::Solution, Self::Error>;

    /// Perturbs a solution into a new one.
    fn mutation<R: Rng>(
        &mut self,
        solution: &Self::Solution,
        rng: &mut R,
    ) -> Result<Self::Solution, Self::Error>;

    /// Early-exit predicate, checked once per generation on the global best.
    ///
    /// The default never stops.
    fn stop(
        &mut self,
        _best_solution: &Self::Solution,
        _best_grade: &Self::Grade,
    ) -> Result<bool, Self::Error> {
        Ok(false)
    }
}
