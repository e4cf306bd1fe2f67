#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use figtree_fuzz_utils::{CommandSequence, RunnerState};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq)]
struct UpperLetter(char);

impl<'d> Arbitrary<'d> for UpperLetter {
    fn arbitrary(u: &mut Unstructured<'d>) -> arbitrary::Result<Self> {
        Ok(UpperLetter((b'A' + u.int_in_range(0_u8..=25)?) as char))
    }
}

// Small nodes, so that splits and deep continuations happen after only a few writes
fuzz_target!(|cmds: CommandSequence<u8, UpperLetter>| {
    let cmds = cmds.map_value(|c| c.0);

    let mut runner: RunnerState<u8, char, 1> = RunnerState::init(cmds.min, cmds.max);

    for c in &cmds.cmds {
        runner.run_cmd(c);
    }
});
