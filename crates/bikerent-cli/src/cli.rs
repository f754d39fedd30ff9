#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Entities,
    Sql(SqlArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Select,
    Search,
    Insert,
    Update,
    UpdateWhere,
    Delete,
    DeleteWhere,
    DeleteAll,
}

impl Op {
    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(match s {
            "select" => Op::Select,
            "search" => Op::Search,
            "insert" => Op::Insert,
            "update" => Op::Update,
            "update-where" => Op::UpdateWhere,
            "delete" => Op::Delete,
            "delete-where" => Op::DeleteWhere,
            "delete-all" => Op::DeleteAll,
            other => anyhow::bail!("unknown operation: {other}"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlArgs {
    pub entity: String,
    pub op: Op,
    pub filter: Option<serde_json::Value>,
    pub update: Option<serde_json::Value>,
    pub id: Option<serde_json::Value>,
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "entities" => Ok(Command::Entities),
        "sql" => parse_sql(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_sql<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut positional: Vec<&str> = Vec::new();
    let mut filter = None;
    let mut update = None;
    let mut id = None;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => json = true,
            "--where" | "--set" | "--row" | "--id" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("{token} requires a value");
                };
                assign(token, v, &mut filter, &mut update, &mut id)?;
            }
            _ if token.starts_with("--") && token.contains('=') => {
                let (flag, v) = token.split_once('=').unwrap_or((token, ""));
                if !matches!(flag, "--where" | "--set" | "--row" | "--id") {
                    anyhow::bail!("unknown argument: {flag}");
                }
                assign(flag, v, &mut filter, &mut update, &mut id)?;
            }
            _ if token.starts_with("--") => anyhow::bail!("unknown argument: {token}"),
            other => positional.push(other),
        }
    }

    let [entity, op] = positional.as_slice() else {
        anyhow::bail!("usage: bikerent sql <entity> <operation> [options]");
    };

    Ok(Command::Sql(SqlArgs {
        entity: entity.to_string(),
        op: Op::parse(op)?,
        filter,
        update,
        id,
        json,
    }))
}

fn assign(
    flag: &str,
    raw: &str,
    filter: &mut Option<serde_json::Value>,
    update: &mut Option<serde_json::Value>,
    id: &mut Option<serde_json::Value>,
) -> anyhow::Result<()> {
    match flag {
        "--where" => *filter = Some(parse_json(flag, raw)?),
        "--set" | "--row" => *update = Some(parse_json(flag, raw)?),
        // Bare words are taken as strings so `--id abc` does not need quoting.
        _ => *id = Some(serde_json::from_str(raw).unwrap_or_else(|_| raw.into())),
    }
    Ok(())
}

fn parse_json(flag: &str, raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("{flag}: invalid JSON: {e}"))
}

pub fn print_help() {
    println!(
        "\
bikerent - preview the SQL built from a filter or update body

USAGE:
  bikerent entities
  bikerent sql <entity> <operation> [--where JSON] [--set JSON] [--row JSON] [--id VALUE] [--json]

OPERATIONS:
  select        SELECT * (filtered by --where when given)
  search        like select, text values compare with ILIKE (requires --where)
  insert        INSERT the --row object
  update        UPDATE by primary key (requires --id and --set)
  update-where  UPDATE rows matching --where with --set
  delete        DELETE by primary key (requires --id)
  delete-where  DELETE rows matching --where
  delete-all    DELETE every row

OPTIONS:
  --json        print {{\"sql\": ..., \"params\": [...]}} instead of plain text

EXAMPLE:
  bikerent sql users update-where --where '{{\"user_id\": 5}}' --set '{{\"name\": \"Bob\"}}'"
    );
}
