use core::fmt::{Display, Formatter, Result};

/// Wrapper type that formats an iterator as newline-separated values, with a trailing newline
/// after the last one.
pub struct Lines<I>(pub I);

impl<I> Display for Lines<I>
where
    I: Iterator + Clone,
    I::Item: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0
            .clone()
            .try_fold((), |(), line| write!(f, "{line}\n"))
    }
}

/// Formats limbs in storage order: least significant first, decimal, separated by single spaces.
/// An empty slice formats as nothing.
pub struct LimbList<'a>(pub &'a [u64]);

impl Display for LimbList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_spaced(f, self.0.iter())
    }
}

/// Formats limbs the way a big-integer test harness prints its internal limb vector: most
/// significant limb first, separated by single spaces. A value with no limbs prints as `0`.
///
/// ```
/// # use limbgen_base::fmt::TestOut;
/// assert_eq!("0", TestOut(&[]).to_string());
/// assert_eq!("2 3", TestOut(&[3, 2]).to_string());
/// ```
pub struct TestOut<'a>(pub &'a [u64]);

impl Display for TestOut<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        write_spaced(f, self.0.iter().rev())
    }
}

fn write_spaced<'a>(f: &mut Formatter<'_>, mut iter: impl Iterator<Item = &'a u64>) -> Result {
    let Some(first) = iter.next() else {
        return Ok(());
    };
    write!(f, "{first}")?;
    iter.try_for_each(|limb| write!(f, " {limb}"))
}
