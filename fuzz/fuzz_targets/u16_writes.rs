#![no_main]
use figtree_fuzz_utils::{CommandSequence, RunnerState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|cmds: CommandSequence<u16, u8>| {
    let mut runner: RunnerState<u16, u8, 3> = RunnerState::init(cmds.min, cmds.max);

    for c in &cmds.cmds {
        runner.run_cmd(c);
    }
});
