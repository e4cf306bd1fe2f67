use arbitrary::{Arbitrary, Unstructured};
use figtree::mock::{coalesce, Mock};
use figtree::range::{EndBound, StartBound};
use figtree::{FigTree, Index};
use std::fmt::{self, Debug, Formatter};
use std::panic::{self, RefUnwindSafe, UnwindSafe};

fn expect_might_panic<R, F: UnwindSafe + FnOnce() -> R>(f: F) -> Result<R, ()> {
    // set a custom hook that does nothing, so we don't print panic information every time the mock
    // implementation panics
    panic::set_hook(Box::new(|_| {}));

    let result = panic::catch_unwind(f).map_err(|_| ());

    // remove our custom hook
    let _ = panic::take_hook();

    result
}

/// Bounds on the index types usable by the fuzzer: the mock needs to convert them to and from
/// cell offsets
pub trait FuzzIndex: Index + Into<u64> + TryFrom<u64> + UnwindSafe + RefUnwindSafe {}

impl<I: Index + Into<u64> + TryFrom<u64> + UnwindSafe + RefUnwindSafe> FuzzIndex for I {}

const VARIANTS: u8 = 4;

/// A single operation on a [`FigTree`], alongside the result expected from it
#[derive(Clone)]
pub enum Command<I, V> {
    Write {
        start: I,
        end: I,
        value: V,
        /// Whether the write should be rejected
        fails: bool,
    },
    Lookup {
        index: I,
        value: Option<V>,
    },
    Read {
        start: StartBound<I>,
        end: EndBound<I>,
        /// The coalesced runs in the range, if the call shouldn't fail
        runs: Result<Vec<(I, I, V)>, ()>,
    },
    Clear,
}

/// Sequence of [`Command`]s, run against a single tree with the given domain
pub struct CommandSequence<I, V> {
    pub min: I,
    pub max: I,
    pub cmds: Vec<Command<I, V>>,
}

impl<I: Debug, V: Debug> Debug for CommandSequence<I, V> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (min, max) = (&self.min, &self.max);
        f.write_str("#[test]\n")?;
        f.write_str("fn test_case() {\n")?;
        writeln!(f, "    let mut tree = FigTree::with_domain({min:?}, {max:?}).unwrap();")?;
        for c in &self.cmds {
            c.fmt(f)?;
        }
        f.write_str("}")
    }
}

impl<I: Debug, V: Debug> Debug for Command<I, V> {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Write { start, end, value, fails: false } => {
                writeln!(f, "    tree.write({start:?}, {end:?}, {value:?}).unwrap();")?;
                f.write_str("    tree.validate();\n")
            }
            Self::Write { start, end, value, fails: true } => {
                writeln!(f, "    assert!(tree.write({start:?}, {end:?}, {value:?}).is_err());")
            }
            Self::Lookup { index, value: Some(v) } => {
                writeln!(f, "    assert_eq!(tree.lookup({index:?}), Some(&{v:?}));")
            }
            Self::Lookup { index, value: None } => {
                writeln!(f, "    assert_eq!(tree.lookup({index:?}), None);")
            }
            Self::Read { start, end, runs } => {
                let start_fmt = match start {
                    StartBound::Unbounded => String::new(),
                    StartBound::Included(i) => format!("{i:?}"),
                };
                let end_fmt = match end {
                    EndBound::Unbounded => String::new(),
                    EndBound::Included(i) => format!("={i:?}"),
                    EndBound::Excluded(i) => format!("{i:?}"),
                };

                let call = format!("tree.read({start_fmt}..{end_fmt})");
                match runs {
                    Ok(runs) => writeln!(f, "    assert_eq!(coalesce({call}.unwrap()), {runs:?});"),
                    Err(()) => writeln!(f, "    assert!({call}.is_err());"),
                }
            }
            Self::Clear => f.write_str("    tree.clear();\n"),
        }
    }
}

impl<I, V> CommandSequence<I, V> {
    pub fn map_value<T, F: FnMut(V) -> T>(self, mut f: F) -> CommandSequence<I, T> {
        CommandSequence {
            min: self.min,
            max: self.max,
            cmds: self.cmds.into_iter().map(|c| c.map_value(&mut f)).collect(),
        }
    }
}

impl<I, V> Command<I, V> {
    #[rustfmt::skip]
    pub fn map_value<T, F: FnMut(V) -> T>(self, mut f: F) -> Command<I, T> {
        match self {
            Self::Write { start, end, value, fails } => Command::Write {
                start,
                end,
                value: f(value),
                fails,
            },
            Self::Lookup { index, value } => Command::Lookup { index, value: value.map(f) },
            Self::Read { start, end, runs } => Command::Read {
                start,
                end,
                runs: runs.map(|rs| rs.into_iter().map(|(s, e, v)| (s, e, f(v))).collect()),
            },
            Self::Clear => Command::Clear,
        }
    }
}

impl<'d, I, V> Arbitrary<'d> for CommandSequence<I, V>
where
    I: Arbitrary<'d> + FuzzIndex,
    V: Arbitrary<'d> + UnwindSafe + RefUnwindSafe + Clone + PartialEq,
{
    fn arbitrary(u: &mut Unstructured<'d>) -> arbitrary::Result<Self> {
        let (a, b): (I, I) = u.arbitrary()?;
        let (min, max) = (a.min(b), a.max(b));

        let mut mock = Mock::new(min, max);
        let mut cmds = Vec::new();

        while !u.is_empty() {
            let variant = u.int_in_range(0..=VARIANTS - 1)?;
            cmds.push(Command::arbitrary(u, variant, min, max, &mut mock)?);
        }

        Ok(CommandSequence { min, max, cmds })
    }
}

impl<'d, I, V> Command<I, V>
where
    I: Arbitrary<'d> + FuzzIndex,
    V: Arbitrary<'d> + UnwindSafe + RefUnwindSafe + Clone + PartialEq,
{
    /// Creates a new command and executes it on the provided mock
    fn arbitrary(
        u: &mut Unstructured<'d>,
        variant: u8,
        min: I,
        max: I,
        mock: &mut Mock<I, V>,
    ) -> arbitrary::Result<Self> {
        match variant {
            // write
            0 => {
                let start: I = u.arbitrary()?;
                let end: I = u.arbitrary()?;
                let value: V = u.arbitrary()?;

                let mut attempt = mock.clone();
                let value_cloned = value.clone();
                let result = expect_might_panic(move || {
                    attempt.write(start, end, value_cloned);
                    attempt
                });

                let fails = match result {
                    Ok(written) => {
                        *mock = written;
                        false
                    }
                    Err(()) => true,
                };

                Ok(Self::Write { start, end, value, fails })
            }
            // lookup
            1 => {
                let index = u.arbitrary()?;
                Ok(Self::Lookup { index, value: mock.lookup(index).cloned() })
            }
            // read
            2 => {
                let start: StartBound<I> = u.arbitrary()?;
                let end: EndBound<I> = u.arbitrary()?;

                let snapshot = &*mock;
                let runs = expect_might_panic(|| snapshot.read((start, end)));
                Ok(Self::Read { start, end, runs })
            }
            // clear
            3 => {
                *mock = Mock::new(min, max);
                Ok(Self::Clear)
            }
            _ => unreachable!("bad Command variant {variant}"),
        }
    }
}

/// Ongoing state for executing commands to a [`FigTree`] and checking their results
pub struct RunnerState<I, V, const ORDER: usize> {
    tree: FigTree<I, V, ORDER>,
}

impl<I, V, const ORDER: usize> RunnerState<I, V, ORDER>
where
    I: FuzzIndex,
    V: Debug + Clone + PartialEq,
{
    /// Creates a new `RunnerState` with an empty tree over `min..=max`
    pub fn init(min: I, max: I) -> Self {
        RunnerState {
            tree: FigTree::with_domain(min, max).unwrap(),
        }
    }

    /// Runs the command
    #[rustfmt::skip]
    pub fn run_cmd(&mut self, cmd: &Command<I, V>) {
        match cmd {
            Command::Write { start, end, value, fails: false } => {
                self.tree.write(*start, *end, value.clone()).unwrap();
                self.tree.validate();
            }
            Command::Write { start, end, value, fails: true } => {
                assert!(self.tree.write(*start, *end, value.clone()).is_err());
            }
            Command::Lookup { index, value } => {
                assert_eq!(self.tree.lookup(*index), value.as_ref());
            }
            Command::Read { start, end, runs: Ok(runs) } => {
                let read = self.tree.read((*start, *end)).unwrap();
                assert_eq!(&coalesce(read), runs);
            }
            Command::Read { start, end, runs: Err(()) } => {
                assert!(self.tree.read((*start, *end)).is_err());
            }
            Command::Clear => {
                self.tree.clear();
                assert!(self.tree.is_empty());
            }
        }
    }
}
