//! Console front-end for a demo command tree.
//!
//! Reads command lines from stdin and prints the match result of each one,
//! or prints completions for a single line with `--complete`.

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cmdtree::resolvers::{StaticSuggestions, context_fn};
use cmdtree::{
    ArgType, Command, CommandError, CommandFlag, CommandParameter, CommandUsage, Dispatcher,
    DispatcherConfig, NumericRange, Source, Value,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(about = "Dispatch command lines against a demo usage tree")]
#[command(version)]
struct Args {
    /// Config file (default: .cmdtree/config.toml in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print completions for LINE instead of reading stdin
    #[arg(long, value_name = "LINE")]
    complete: Option<String>,

    /// Permission nodes the console does not hold (repeatable)
    #[arg(long = "deny", value_name = "PERMISSION")]
    denied: Vec<String>,
}

/// Replies go to stdout, warnings and errors to stderr.
struct ConsoleSource;

impl Source for ConsoleSource {
    fn name(&self) -> &str {
        "console"
    }

    fn reply(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn is_console(&self) -> bool {
        true
    }
}

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

fn text(ctx: &cmdtree::ResolvedContext<'_>, name: &str) -> String {
    ctx.argument(name).map(Value::to_string).unwrap_or_default()
}

fn build_dispatcher(config: DispatcherConfig, denied: Vec<String>) -> Result<Dispatcher> {
    let sender = ArgType::named("sender");
    let mut builder = Dispatcher::builder();
    builder
        .config(config)
        .permission_resolver(move |_: &dyn Source, permission: &str| {
            !denied.iter().any(|node| node == permission)
        })
        .register_named_suggestion_resolver("letters", StaticSuggestions::new(["x", "y", "z"]))
        .register_context_resolver(
            sender.clone(),
            context_fn(|ctx| Ok(Value::Str(ctx.source().name().to_string()))),
        );

    builder.register_command(
        Command::new("ban")
            .require("command.ban")
            .describe("Ban a player")
            .with_default(CommandUsage::new().execute(|ctx| {
                ctx.source()
                    .reply("Usage: /ban <player> [-silent] [duration] [reason...]");
                Ok(())
            }))
            .usage(
                CommandUsage::new()
                    .parameter(CommandParameter::required("player", ArgType::STRING))
                    .parameter(CommandParameter::flag(CommandFlag::switch("silent").alias("s")))
                    .parameter(CommandParameter::optional("duration", ArgType::STRING).default_raw("permanent"))
                    .parameter(
                        CommandParameter::optional("reason", ArgType::STRING)
                            .greedy()
                            .default_raw("Breaking server laws"),
                    )
                    .execute(|ctx| {
                        let message = format!(
                            "Banning {} for {} due to {}",
                            text(ctx, "player"),
                            text(ctx, "duration"),
                            text(ctx, "reason")
                        );
                        if ctx.switch("silent") {
                            ctx.source().reply(&format!("(silent) {message}"));
                        } else {
                            ctx.source().reply(&message);
                        }
                        Ok(())
                    }),
            ),
    )?;

    let first = builder.attach(
        Command::new("first")
            .with_default(CommandUsage::new().execute(|ctx| {
                ctx.source().reply("first: default usage");
                Ok(())
            }))
            .usage(
                CommandUsage::new()
                    .parameter(CommandParameter::required("otherText", ArgType::STRING).suggest_with("letters"))
                    .parameter(CommandParameter::required("arg1", ArgType::STRING))
                    .execute(|ctx| {
                        ctx.source().reply(&format!(
                            "first: otherText={} arg1={}",
                            text(ctx, "otherText"),
                            text(ctx, "arg1")
                        ));
                        Ok(())
                    }),
            ),
    )?;
    let othersub = builder.attach(
        Command::new("othersub").usage(
            CommandUsage::new()
                .parameter(CommandParameter::required("otherArg", ArgType::STRING))
                .execute(|ctx| {
                    ctx.source()
                        .reply(&format!("othersub: otherArg={}", text(ctx, "otherArg")));
                    Ok(())
                }),
        ),
    )?;
    builder.register_command(
        Command::new("test")
            .with_default(CommandUsage::new().execute(|ctx| {
                ctx.source().reply("test: default usage");
                Ok(())
            }))
            .usage(
                CommandUsage::new()
                    .parameter(CommandParameter::required("arg1", ArgType::STRING))
                    .execute(|ctx| {
                        ctx.source().reply(&format!("test: arg1={}", text(ctx, "arg1")));
                        Ok(())
                    }),
            )
            .sub_command(first)
            .sub_command(othersub),
    )?;

    builder.register_command(
        Command::new("gamemode").alias("gm").usage(
            CommandUsage::new()
                .parameter(CommandParameter::required(
                    "mode",
                    ArgType::enumeration("gamemode", ["survival", "creative", "adventure", "spectator"]),
                ))
                .execute(|ctx| {
                    ctx.source()
                        .reply(&format!("Gamemode set to {}", text(ctx, "mode")));
                    Ok(())
                }),
        ),
    )?;

    builder.register_command(
        Command::new("give").usage(
            CommandUsage::new()
                .parameter(CommandParameter::required("item", ArgType::STRING))
                .parameter(CommandParameter::required("amount", ArgType::INT).with_range(NumericRange::between(1.0, 64.0)))
                .execute(|ctx| {
                    ctx.source().reply(&format!(
                        "Giving {} {}",
                        text(ctx, "amount"),
                        text(ctx, "item")
                    ));
                    Ok(())
                }),
        ),
    )?;

    builder.register_command(Command::new("whoami").with_default(CommandUsage::new().execute(
        move |ctx| {
            let name = ctx.context_value(&sender)?;
            ctx.source().reply(&format!("You are {name}"));
            Ok::<(), CommandError>(())
        },
    )))?;

    Ok(builder.build())
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => DispatcherConfig::load_from_path(path),
        None => DispatcherConfig::load(&std::env::current_dir()?),
    };
    let prefix = config.command_prefix.clone();
    let dispatcher = build_dispatcher(config, args.denied)?;
    let source = ConsoleSource;

    if let Some(line) = &args.complete {
        let mut stdout = io::stdout().lock();
        for candidate in dispatcher.complete_line(&source, line) {
            writeln!(stdout, "{candidate}")?;
        }
        return Ok(());
    }

    info!(commands = dispatcher.registered_commands().count(), "reading command lines from stdin");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        let line = line.strip_prefix(prefix.as_str()).unwrap_or(line);
        let Some((label, rest)) = line
            .split_once(char::is_whitespace)
            .or_else(|| (!line.is_empty()).then_some((line, "")))
        else {
            continue;
        };
        let result = dispatcher.dispatch_line(&source, label, rest);
        println!("[{result}]");
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    install_broken_pipe_handler();

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[cmdtree] Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
