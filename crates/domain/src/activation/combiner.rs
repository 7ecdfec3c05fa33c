//! Joint candidate space across devices.

use super::ActivationArray;

/// Cartesian product of per-device candidate lists.
///
/// Each tuple holds one candidate per device, in device order. The first
/// device varies slowest. No deduplication or filtering happens here; bound
/// the size with [`candidate_count`] before calling.
#[must_use]
pub fn activation_tuples<L>(lists: &[L]) -> Vec<Vec<ActivationArray>>
where
    L: AsRef<[ActivationArray]>,
{
    lists.iter().fold(vec![Vec::new()], |tuples, candidates| {
        tuples
            .iter()
            .flat_map(|prefix| {
                candidates.as_ref().iter().map(move |candidate| {
                    let mut tuple = Vec::with_capacity(prefix.len() + 1);
                    tuple.extend_from_slice(prefix);
                    tuple.push(candidate.clone());
                    tuple
                })
            })
            .collect()
    })
}

/// Size of the cartesian product, or `None` on overflow.
#[must_use]
pub fn candidate_count<L>(lists: &[L]) -> Option<usize>
where
    L: AsRef<[ActivationArray]>,
{
    lists
        .iter()
        .try_fold(1usize, |count, candidates| {
            count.checked_mul(candidates.as_ref().len())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(time_points: usize, offsets: &[usize]) -> Vec<ActivationArray> {
        offsets
            .iter()
            .map(|offset| ActivationArray::with_run(time_points, *offset, 1))
            .collect()
    }

    #[test]
    fn should_pair_every_candidate_of_two_devices() {
        let a = list(4, &[0, 1, 2]);
        let b = list(4, &[2, 3]);
        let tuples = activation_tuples(&[a.clone(), b.clone()]);

        assert_eq!(tuples.len(), 6);
        for first in &a {
            for second in &b {
                assert!(tuples.contains(&vec![first.clone(), second.clone()]));
            }
        }
    }

    #[test]
    fn should_vary_first_device_slowest() {
        let a = list(3, &[0, 1]);
        let b = list(3, &[1, 2]);
        let tuples = activation_tuples(&[a.clone(), b.clone()]);
        assert_eq!(tuples[0], vec![a[0].clone(), b[0].clone()]);
        assert_eq!(tuples[1], vec![a[0].clone(), b[1].clone()]);
        assert_eq!(tuples[2], vec![a[1].clone(), b[0].clone()]);
        assert_eq!(tuples[3], vec![a[1].clone(), b[1].clone()]);
    }

    #[test]
    fn should_return_nothing_when_a_device_has_no_candidates() {
        let tuples = activation_tuples(&[list(3, &[0, 1]), Vec::new()]);
        assert!(tuples.is_empty());
    }

    #[test]
    fn should_return_one_empty_tuple_for_no_devices() {
        let tuples = activation_tuples::<Vec<ActivationArray>>(&[]);
        assert_eq!(tuples, vec![Vec::<ActivationArray>::new()]);
    }

    #[test]
    fn should_count_product_size() {
        let lists = vec![list(5, &[0, 1, 2]), list(5, &[3, 4]), list(5, &[1, 2, 3, 4])];
        assert_eq!(candidate_count(&lists), Some(24));
        assert_eq!(activation_tuples(&lists).len(), 24);
    }
}
