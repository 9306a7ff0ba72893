//! `berth toolchain` command

use anyhow::Result;

use crate::cli::{ToolchainArgs, ToolchainCommands, ToolchainLaunchersArgs, ToolchainPathArgs};
use crate::commands::{GlobalOptions, Session};
use berth::core::role::ToolRequest;
use berth::ops::launcher::LauncherDescriptorBuilder;
use berth::util::process::SystemRunner;

pub fn execute(args: ToolchainArgs, options: GlobalOptions) -> Result<()> {
    let session = Session::load(options)?;

    match args.command {
        ToolchainCommands::List => list(&session),
        ToolchainCommands::Path(path_args) => path(&session, path_args),
        ToolchainCommands::Root(root_args) => {
            let desc = session.registry.get(&root_args.toolchain)?;
            println!("{}", desc.bootstrap_root(&session.ctx)?.display());
            Ok(())
        }
        ToolchainCommands::Launchers(launcher_args) => launchers(&session, launcher_args),
    }
}

fn list(session: &Session) -> Result<()> {
    if session.registry.is_empty() {
        println!("No toolchains registered.");
        return Ok(());
    }

    for desc in session.registry.iter() {
        println!("{} ({})", desc.name(), desc.primary_distribution());
        println!("  command: {}", desc.command_name());
        for role in desc.supported_roles() {
            println!("  {:<8} {}", role.as_str(), desc.aliases(role)?.join(", "));
        }
    }

    Ok(())
}

fn path(session: &Session, args: ToolchainPathArgs) -> Result<()> {
    let (desc, request) = match args.tool {
        Some(tool) => {
            let desc = session.registry.get(&args.toolchain)?;
            let request = tool
                .parse::<ToolRequest>()
                .map_err(|_| desc.unsupported(&tool))?;
            (desc, request)
        }
        None => session.registry.lookup_tool(&args.toolchain)?,
    };

    let runner = SystemRunner;
    let resolver = session.resolver(&runner)?;
    let path = resolver.resolve(desc, request)?;
    println!("{}", path.display());

    Ok(())
}

fn launchers(session: &Session, args: ToolchainLaunchersArgs) -> Result<()> {
    let desc = session.registry.get(&args.toolchain)?;
    let launchers = LauncherDescriptorBuilder::new().build(desc)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&launchers)?);
        return Ok(());
    }

    for launcher in &launchers {
        println!("{}", launcher.destination.display());
        println!("  main:  {}", launcher.main_class);
        for link in &launcher.links {
            println!("  link:  {}", link.display());
        }
    }

    Ok(())
}
