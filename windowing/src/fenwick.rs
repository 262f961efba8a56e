use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over the *measured* items of a list.
///
/// Two trees share one index space: `sums` holds measured heights, `counts` holds how many
/// items in each node are measured. Unmeasured items contribute a caller-supplied `fallback`
/// height, so the effective prefix is
/// `measured_sum(i) + (i - measured_count(i)) * fallback`.
///
/// Keeping the fallback out of the tree means an EMA update never touches the tree.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    sums: Vec<f64>,     // 1-indexed
    counts: Vec<usize>, // 1-indexed
    total_sum: f64,
    total_count: usize,
    max_bit: usize,
}

impl Fenwick {
    pub(crate) fn new(n: usize) -> Self {
        let max_bit = if n == 0 {
            0
        } else {
            highest_power_of_two_leq(n)
        };
        Self {
            sums: alloc::vec![0.0; n + 1],
            counts: alloc::vec![0; n + 1],
            total_sum: 0.0,
            total_count: 0,
            max_bit,
        }
    }

    /// Builds the tree in `O(n)` from per-index measurements (`None` = unmeasured).
    pub(crate) fn from_entries(entries: &[Option<f64>]) -> Self {
        let n = entries.len();
        let mut fw = Self::new(n);
        for i in 1..=n {
            if let Some(h) = entries[i - 1] {
                fw.sums[i] += h;
                fw.counts[i] += 1;
                fw.total_sum += h;
                fw.total_count += 1;
            }
            let j = i + lsb(i);
            if j <= n {
                fw.sums[j] += fw.sums[i];
                fw.counts[j] += fw.counts[i];
            }
        }
        fw
    }

    pub(crate) fn len(&self) -> usize {
        self.sums.len().saturating_sub(1)
    }

    /// Adds `delta` to the measured height at `index`, and marks it measured when
    /// `newly_measured` is set.
    pub(crate) fn add(&mut self, index: usize, delta: f64, newly_measured: bool) {
        let n = self.len();
        if index >= n {
            return;
        }
        self.total_sum += delta;
        if newly_measured {
            self.total_count += 1;
        }
        let mut i = index + 1;
        while i <= n {
            self.sums[i] += delta;
            if newly_measured {
                self.counts[i] += 1;
            }
            i += lsb(i);
        }
    }

    /// Returns `(measured_sum, measured_count)` over the first `count` items.
    pub(crate) fn prefix(&self, count: usize) -> (f64, usize) {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0.0;
        let mut measured = 0usize;
        while i > 0 {
            sum += self.sums[i];
            measured += self.counts[i];
            i &= i - 1;
        }
        (sum, measured)
    }

    /// Effective height of the first `count` items.
    pub(crate) fn prefix_height(&self, count: usize, fallback: f64) -> f64 {
        let count = cmp::min(count, self.len());
        let (sum, measured) = self.prefix(count);
        sum + (count - measured) as f64 * fallback
    }

    pub(crate) fn total_height(&self, fallback: f64) -> f64 {
        self.total_sum + (self.len() - self.total_count) as f64 * fallback
    }

    pub(crate) fn measured_count(&self) -> usize {
        self.total_count
    }

    /// Returns the number of items whose effective prefix height is `<= target`.
    ///
    /// `index = lower_bound(offset)` is the item that contains `offset` (unclamped).
    pub(crate) fn lower_bound(&self, target: f64, fallback: f64) -> usize {
        self.search(target, fallback, |prefix, target| prefix <= target)
    }

    /// Returns the number of items whose effective prefix height is `< target`.
    pub(crate) fn strict_lower_bound(&self, target: f64, fallback: f64) -> usize {
        self.search(target, fallback, |prefix, target| prefix < target)
    }

    /// Largest `count` with `take(prefix_height(count), target)`.
    ///
    /// The descent subtracts node sums top-down while `prefix_height` adds them bottom-up, so
    /// with fractional heights the two can round apart at an item boundary. The result is
    /// settled against `prefix_height`, which makes `lower_bound(prefix_height(i)) == i` for
    /// every item with a non-zero height.
    fn search(&self, target: f64, fallback: f64, take: impl Fn(f64, f64) -> bool) -> usize {
        let n = self.len();
        let mut idx = self.descend(target, fallback, &take);
        while idx > 0 && !take(self.prefix_height(idx, fallback), target) {
            idx -= 1;
        }
        while idx < n && take(self.prefix_height(idx + 1, fallback), target) {
            idx += 1;
        }
        idx
    }

    fn descend(&self, mut target: f64, fallback: f64, take: &impl Fn(f64, f64) -> bool) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }

        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n {
                let unmeasured = bit - self.counts[next];
                let node = self.sums[next] + unmeasured as f64 * fallback;
                if take(node, target) {
                    target -= node;
                    idx = next;
                }
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
