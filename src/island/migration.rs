//! Ring migration between islands and between archipelagos.
//!
//! Both levels use the same one-way ring: unit `i` pulls the `k` best of
//! unit `i - 1` (unit 0 pulls from the last one) into its `k` worst slots.
//! All emigrants are copied before any destination is written, so every
//! unit receives its predecessor's state from before the pass.

use super::population::Archipelago;
use super::types::SolutionGrade;

#[inline]
fn previous(index: usize, len: usize) -> usize {
    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

/// Migrates `k` solutions around the ring of islands of one archipelago.
///
/// Returns the number of islands that received immigrants.
pub fn migrate_islands<S, G>(archipelago: &mut Archipelago<S, G>, k: usize) -> usize
where
    S: Clone,
    G: Clone + PartialOrd,
{
    if k == 0 || archipelago.is_empty() {
        return 0;
    }
    let emigrants: Vec<Vec<SolutionGrade<S, G>>> = archipelago
        .islands()
        .iter()
        .map(|island| island.best(k).to_vec())
        .collect();

    let len = emigrants.len();
    for (i, island) in archipelago.islands_mut().iter_mut().enumerate() {
        island.replace_worst(&emigrants[previous(i, len)]);
    }
    len
}

/// Migrates `k` solutions around the ring of archipelagos, between their
/// lead islands.
///
/// Returns the number of archipelagos that received immigrants.
pub fn migrate_archipelagos<S, G>(archipelagos: &mut [Archipelago<S, G>], k: usize) -> usize
where
    S: Clone,
    G: Clone + PartialOrd,
{
    if k == 0 || archipelagos.is_empty() {
        return 0;
    }
    let emigrants: Vec<Vec<SolutionGrade<S, G>>> = archipelagos
        .iter()
        .map(|arch| arch.lead().map(|lead| lead.best(k).to_vec()).unwrap_or_default())
        .collect();

    let len = emigrants.len();
    let mut received = 0;
    for (a, arch) in archipelagos.iter_mut().enumerate() {
        if let Some(lead) = arch.lead_mut() {
            lead.replace_worst(&emigrants[previous(a, len)]);
            received += 1;
        }
    }
    received
}

/// Whether a migration with this interval is due at `generation`.
///
/// An interval of 0 disables the migration.
#[inline]
pub fn is_due(generation: usize, interval: usize) -> bool {
    interval != 0 && generation % interval == 0
}
