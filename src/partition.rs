//! Static division of a round's files among a fixed number of workers.
//!
//! Every strategy returns exactly `workers` contiguous ranges that together
//! cover `0..files.len()` with no gaps or overlaps. Ranges may be empty.

use crate::config::PartitionStrategy;
use crate::CsvFileRef;
use std::ops::Range;

pub fn partition(
    files: &[CsvFileRef],
    workers: usize,
    strategy: PartitionStrategy,
) -> Vec<Range<usize>> {
    match strategy {
        PartitionStrategy::EqualCount => equal_count(files.len(), workers),
        PartitionStrategy::ByteSize => {
            let sizes: Vec<u64> = files.iter().map(|f| f.size_bytes).collect();
            byte_size(&sizes, workers)
        }
    }
}

/// `floor(n / workers)` items each (at least one), last worker takes the rest.
pub fn equal_count(n: usize, workers: usize) -> Vec<Range<usize>> {
    let group_size = (n / workers.max(1)).max(1);
    (0..workers)
        .map(|i| {
            let start = i.saturating_mul(group_size);
            if start >= n {
                return n..n;
            }
            let end = if i == workers - 1 {
                n
            } else {
                (start + group_size).min(n)
            };
            start..end
        })
        .collect()
}

/// Cuts where the running byte total first reaches `k * total / workers`.
/// Falls back to `equal_count` when all files are empty.
pub fn byte_size(sizes: &[u64], workers: usize) -> Vec<Range<usize>> {
    let total: u128 = sizes.iter().map(|&s| u128::from(s)).sum();
    if total == 0 || workers <= 1 {
        return equal_count(sizes.len(), workers);
    }

    let mut bounds = Vec::with_capacity(workers + 1);
    bounds.push(0);
    let mut acc: u128 = 0;
    let mut next = 0;
    for k in 1..workers {
        let target = total * k as u128 / workers as u128;
        while next < sizes.len() && acc < target {
            acc += u128::from(sizes[next]);
            next += 1;
        }
        bounds.push(next);
    }
    bounds.push(sizes.len());

    bounds.windows(2).map(|w| w[0]..w[1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], n: usize, workers: usize) {
        assert_eq!(ranges.len(), workers);
        let mut expected_start = 0;
        for range in ranges.iter().filter(|r| !r.is_empty()) {
            assert_eq!(range.start, expected_start, "gap or overlap in {ranges:?}");
            expected_start = range.end;
        }
        assert_eq!(expected_start, n);
        assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), n);
    }

    #[test]
    fn equal_count_covers_input_for_many_shapes() {
        for n in 0..40 {
            for workers in 1..12 {
                assert_covers(&equal_count(n, workers), n, workers);
            }
        }
    }

    #[test]
    fn last_worker_takes_remainder() {
        let ranges = equal_count(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn more_workers_than_files() {
        let ranges = equal_count(3, 5);
        assert_eq!(ranges.iter().filter(|r| r.len() == 1).count(), 3);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 2);
        assert_eq!(&ranges[..3], &[0..1, 1..2, 2..3]);
    }

    #[test]
    fn reference_pool_size_over_large_input() {
        let ranges = equal_count(1000, 320);
        assert_covers(&ranges, 1000, 320);
        // floor(1000 / 320) = 3, so the last worker gets 1000 - 319 * 3
        assert_eq!(ranges[0].len(), 3);
        assert_eq!(ranges[319].len(), 43);
    }

    #[test]
    fn byte_size_balances_uneven_files() {
        let sizes = [900, 10, 10, 10, 10, 10, 10, 10, 10, 10];
        let ranges = byte_size(&sizes, 2);
        assert_eq!(ranges, vec![0..1, 1..10]);
    }

    #[test]
    fn byte_size_covers_input() {
        let sizes: Vec<u64> = (0..37).map(|i| (i * 7919) % 503).collect();
        for workers in 1..10 {
            assert_covers(&byte_size(&sizes, workers), sizes.len(), workers);
        }
    }

    #[test]
    fn byte_size_of_empty_files_falls_back() {
        assert_eq!(byte_size(&[0, 0, 0, 0], 2), equal_count(4, 2));
    }

    #[test]
    fn partition_dispatches_on_strategy() {
        let files: Vec<CsvFileRef> = [100, 1, 1, 1]
            .iter()
            .enumerate()
            .map(|(i, &size)| CsvFileRef::new(format!("{i}.csv"), size))
            .collect();
        assert_eq!(
            partition(&files, 2, PartitionStrategy::EqualCount),
            vec![0..2, 2..4]
        );
        assert_eq!(
            partition(&files, 2, PartitionStrategy::ByteSize),
            vec![0..1, 1..4]
        );
    }
}
