//! `berth <name>-toolchain <command> [args...]`

use anyhow::{bail, Result};

use crate::commands::{GlobalOptions, Session};
use berth::ops::dispatch::{CommandDispatcher, DispatchKind, DispatchTarget, RuntimeInvocation};
use berth::util::process::SystemRunner;

/// Run a toolchain command and return the tool's exit code.
pub fn execute(argv: Vec<String>, options: GlobalOptions) -> Result<i32> {
    let Some((command, rest)) = argv.split_first() else {
        bail!("no command given");
    };

    let session = Session::load(options)?;
    let Some(desc) = session.registry.by_command(command) else {
        bail!(
            "no such command: `{}`\n\
             help: toolchain commands are `<name>-toolchain`; registered toolchains: {}",
            command,
            session.registry.names().join(", ")
        );
    };

    let kind = session
        .options
        .dispatch
        .as_deref()
        .or(session.config.runtime.dispatch.as_deref())
        .map(|k| k.parse::<DispatchKind>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or_default();

    let runner = SystemRunner;
    let target = match kind {
        DispatchKind::Runtime => DispatchTarget::Runtime(RuntimeInvocation::from_config(&session.config)),
        DispatchKind::Resolved => DispatchTarget::Resolved(session.resolver(&runner)?),
    };

    let mut dispatcher = CommandDispatcher::new(&session.ctx, &runner, target);
    if let Some(ref env) = session.config.runtime.coverage_env {
        dispatcher = dispatcher.with_coverage_env(env);
    }

    dispatcher.dispatch(desc, rest)
}
