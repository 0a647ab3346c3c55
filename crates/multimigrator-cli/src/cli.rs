use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Up,
    Codegen,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Up(UpArgs),
    Codegen(CodegenArgs),
}

#[derive(Debug, Clone)]
pub struct UpArgs {
    pub migrations: PathBuf,
    pub conn_str: Option<String>,
    pub level: String,
    pub refuse_dirty: bool,
}

#[derive(Debug, Clone)]
pub struct CodegenArgs {
    pub migrations: PathBuf,
    pub package: String,
    pub output: Option<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let first = match it.next() {
        Some(s) => s.as_str(),
        None => return Ok(Command::Help(HelpTopic::Root)),
    };

    match first {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "up" => parse_up(it.map(|s| s.as_str())),
        "codegen" => parse_codegen(it.map(|s| s.as_str())),
        other => anyhow::bail!("unknown command: {other}"),
    }
}

fn parse_up<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut migrations: Option<PathBuf> = None;
    let mut conn_str: Option<String> = None;
    let mut level: Option<String> = None;
    let mut refuse_dirty = false;

    while let Some(arg) = it.next() {
        match arg {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Up)),
            "--migrations" | "--dir" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--migrations requires a value");
                };
                migrations = Some(PathBuf::from(v));
            }
            "--conn-str" | "--database-url" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--conn-str requires a value");
                };
                conn_str = Some(v.to_string());
            }
            "--level" | "--target" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--level requires a value");
                };
                level = Some(v.to_string());
            }
            "--refuse-dirty" => refuse_dirty = true,
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => anyhow::bail!("unexpected positional argument: {other}"),
        }
    }

    let Some(migrations) = migrations else {
        anyhow::bail!("missing required argument: --migrations <migrations root>");
    };
    let Some(level) = level else {
        anyhow::bail!("missing required argument: --level <schema name>");
    };

    Ok(Command::Up(UpArgs {
        migrations,
        conn_str,
        level,
        refuse_dirty,
    }))
}

fn parse_codegen<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut migrations: Option<PathBuf> = None;
    let mut package: Option<String> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = it.next() {
        match arg {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Codegen)),
            "--migrations" | "--dir" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--migrations requires a value");
                };
                migrations = Some(PathBuf::from(v));
            }
            "--package" | "--module-name" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--package requires a value");
                };
                package = Some(v.to_string());
            }
            "--output" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--output requires a value");
                };
                output = Some(PathBuf::from(v));
            }
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => anyhow::bail!("unexpected positional argument: {other}"),
        }
    }

    let Some(migrations) = migrations else {
        anyhow::bail!("missing required argument: --migrations <migrations root>");
    };

    Ok(Command::Codegen(CodegenArgs {
        migrations,
        package: package.unwrap_or_else(|| "SchemaLevel".to_string()),
        output,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => println!(
            "multimigrator - interleaved multi-schema migration scheduler\n\n\
             USAGE:\n    multimigrator <COMMAND>\n\n\
             COMMANDS:\n    \
             up        Apply pending migrations up to a target schema\n    \
             codegen   Generate a SchemaLevel enum from the ordering manifest\n\n\
             Run `multimigrator <COMMAND> --help` for command-specific options."
        ),
        HelpTopic::Up => println!(
            "multimigrator up - apply pending migrations\n\n\
             USAGE:\n    multimigrator up --migrations <PATH> --level <SCHEMA> [OPTIONS]\n\n\
             OPTIONS:\n    \
             --migrations <PATH>      Migrations root (contains order.yml/order.yaml)\n    \
             --level <SCHEMA>         Apply migrations up to and including this schema\n    \
             --conn-str <URL>         Postgres connection string (defaults to $DATABASE_URL)\n    \
             --refuse-dirty           Abort instead of resuming a schema left in a dirty state"
        ),
        HelpTopic::Codegen => println!(
            "multimigrator codegen - generate a SchemaLevel enum\n\n\
             USAGE:\n    multimigrator codegen --migrations <PATH> [OPTIONS]\n\n\
             OPTIONS:\n    \
             --migrations <PATH>      Migrations root (contains order.yml/order.yaml)\n    \
             --package <NAME>         Name of the generated enum (default: SchemaLevel)\n    \
             --output <PATH>          Write to this file instead of stdout"
        ),
    }
}
