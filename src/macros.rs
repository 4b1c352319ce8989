// ============================================================================
// pull-signals - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// This reduces the boilerplate of manually cloning `Rc`-backed handles
/// (`Input<T>`, `Signal<T>`) before moving them into a closure.
///
/// # Usage
///
/// ```rust
/// use pull_signals::{cloned, input};
///
/// let a = input(1);
/// let b = input(2);
///
/// // Instead of:
/// // let a_clone = a.clone();
/// // let b_clone = b.clone();
/// // a_clone.read(move |v| ...);
///
/// // Use:
/// let sum = a.read(cloned!(b => move |v| pull_signals::Computed::value(v + b.get().unwrap_or(0))));
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Dispatch to [`read`](crate::read), [`read2`](crate::read2), or
/// [`read3`](crate::read3) based on how many sources are given (§6).
///
/// # Usage
///
/// ```rust
/// use pull_signals::{input, Computed};
///
/// let a = input(1);
/// let b = input(2);
/// let sum = pull_signals::read!(&a, &b, |av, bv| Computed::value(av + bv));
/// assert_eq!(sum.get().unwrap(), 3);
/// ```
#[macro_export]
macro_rules! read {
    ($source:expr, $f:expr) => {
        $crate::read($source, $f)
    };
    ($a:expr, $b:expr, $f:expr) => {
        $crate::read2($a, $b, $f)
    };
    ($a:expr, $b:expr, $c:expr, $f:expr) => {
        $crate::read3($a, $b, $c, $f)
    };
}
