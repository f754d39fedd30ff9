use anyhow::Context;
use bikerent::schema::{
    Address, Bike, BikeRack, Client, Employee, Notification, Plan, Rent, Review, Users,
    UsersRole,
};
use bikerent::statement;
use bikerent::{Column, Entity, KeyedEntity, Mapping, Statement, Value};
use serde::Serialize;

use crate::cli::{Op, SqlArgs};

struct EntityInfo {
    names: &'static [&'static str],
    build: fn(&SqlArgs) -> anyhow::Result<Statement>,
    describe: fn() -> String,
}

const fn info<E: KeyedEntity>(names: &'static [&'static str]) -> EntityInfo {
    EntityInfo {
        names,
        build: build_keyed::<E>,
        describe: describe::<E>,
    }
}

const fn composite<E: Entity>(names: &'static [&'static str]) -> EntityInfo {
    EntityInfo {
        names,
        build: build_for::<E>,
        describe: describe::<E>,
    }
}

const ENTITIES: &[EntityInfo] = &[
    info::<Users>(&["users", "user"]),
    composite::<UsersRole>(&["users-role", "usersrole", "users_role", "role"]),
    info::<Client>(&["client", "clients"]),
    info::<Employee>(&["employee", "employees"]),
    info::<BikeRack>(&["bike-rack", "bikerack", "bike_rack"]),
    info::<Rent>(&["rent", "rents"]),
    info::<Bike>(&["bike", "bikes"]),
    info::<Plan>(&["plan", "plans"]),
    info::<Review>(&["review", "reviews"]),
    info::<Notification>(&["notification", "notifications"]),
    info::<Address>(&["address", "addresses"]),
];

fn lookup(name: &str) -> anyhow::Result<&'static EntityInfo> {
    let lower = name.to_ascii_lowercase();
    ENTITIES
        .iter()
        .find(|e| e.names.contains(&lower.as_str()))
        .with_context(|| format!("unknown entity: {name} (see `bikerent entities`)"))
}

pub fn describe_all() -> impl Iterator<Item = String> {
    ENTITIES.iter().map(|e| (e.describe)())
}

pub fn build(args: &SqlArgs) -> anyhow::Result<Statement> {
    (lookup(&args.entity)?.build)(args)
}

fn describe<E: Entity>() -> String {
    let columns = <E::Column as Column>::ALL
        .iter()
        .map(|c| format!("{} {}", c.name(), c.kind()))
        .collect::<Vec<_>>()
        .join(", ");
    let key = E::KEY
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} (primary key {}): {}", E::TABLE, key, columns)
}

fn mapping<E: Entity>(
    flag: &str,
    body: Option<&serde_json::Value>,
) -> anyhow::Result<Mapping<E::Column>> {
    let body = body.with_context(|| format!("{flag} is required for this operation"))?;
    Mapping::from_json_value::<E>(body).with_context(|| format!("invalid {flag}"))
}

fn id(args: &SqlArgs) -> anyhow::Result<Value> {
    let raw = args.id.as_ref().context("--id is required for this operation")?;
    Value::from_json(raw).with_context(|| format!("--id must be a scalar, got {raw}"))
}

fn build_keyed<E: KeyedEntity>(args: &SqlArgs) -> anyhow::Result<Statement> {
    let stmt = match args.op {
        Op::Update => {
            statement::update_by_id::<E>(&mapping::<E>("--set", args.update.as_ref())?, id(args)?)?
        }
        Op::Delete => statement::delete_by_id::<E>(id(args)?),
        _ => return build_for::<E>(args),
    };
    Ok(stmt)
}

fn build_for<E: Entity>(args: &SqlArgs) -> anyhow::Result<Statement> {
    let filter = args.filter.as_ref();
    let update = args.update.as_ref();
    let stmt = match args.op {
        Op::Select => match filter {
            Some(_) => statement::select_where::<E>(&mapping::<E>("--where", filter)?)?,
            None => statement::select_all::<E>(),
        },
        Op::Search => statement::search_text::<E>(&mapping::<E>("--where", filter)?)?,
        Op::Insert => statement::insert::<E>(&mapping::<E>("--row", update)?)?,
        Op::UpdateWhere => statement::update_where::<E>(
            &mapping::<E>("--set", update)?,
            &mapping::<E>("--where", filter)?,
        )?,
        Op::Update | Op::Delete => anyhow::bail!(
            "{} has a composite key; use update-where or delete-where",
            E::TABLE
        ),
        Op::DeleteWhere => statement::delete_where::<E>(&mapping::<E>("--where", filter)?)?,
        Op::DeleteAll => statement::delete_all::<E>(),
    };
    Ok(stmt)
}

#[derive(Serialize)]
struct JsonStatement<'a> {
    kind: String,
    sql: &'a str,
    params: &'a [Value],
}

pub fn format_statement(stmt: &Statement, json: bool) -> anyhow::Result<String> {
    if json {
        let out = JsonStatement {
            kind: stmt.kind.to_string(),
            sql: &stmt.sql,
            params: &stmt.params,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&out)?));
    }

    let mut out = format!("{}\n", stmt.sql);
    for (i, value) in stmt.params.iter().enumerate() {
        out.push_str(&format!("  ${} = {}\n", i + 1, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(entity: &str, op: Op) -> SqlArgs {
        SqlArgs {
            entity: entity.to_string(),
            op,
            filter: None,
            update: None,
            id: None,
            json: false,
        }
    }

    #[test]
    fn update_where_numbers_set_before_where() {
        let mut a = args("users", Op::UpdateWhere);
        a.filter = Some(json!({"user_id": 5}));
        a.update = Some(json!({"name": "Bob"}));
        let stmt = build(&a).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE Users SET name = $1 WHERE user_id = $2 RETURNING *"
        );
        assert_eq!(stmt.params, vec![Value::from("Bob"), Value::Int(5)]);
    }

    #[test]
    fn entity_aliases_resolve() {
        let stmt = build(&args("BikeRack", Op::Select)).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM BikeRack");
        let stmt = build(&args("reviews", Op::DeleteAll)).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM reviews RETURNING *");
        assert!(build(&args("bicycle", Op::Select)).is_err());
    }

    #[test]
    fn filter_keeps_body_key_order() {
        let mut a = args("users", Op::Select);
        a.filter = Some(serde_json::from_str(r#"{"email": "a@x.com", "cpf": "111"}"#).unwrap());
        let stmt = build(&a).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM Users WHERE email = $1 AND cpf = $2");
        assert_eq!(stmt.params, vec![Value::from("a@x.com"), Value::from("111")]);
    }

    #[test]
    fn composite_key_entity_uses_filters() {
        let mut a = args("users-role", Op::UpdateWhere);
        a.filter = Some(json!({"user_id": 7, "bike_rack_id": 2}));
        a.update = Some(json!({"role": "manager"}));
        let stmt = build(&a).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE UsersRole SET role = $1 WHERE user_id = $2 AND bike_rack_id = $3 RETURNING *"
        );

        let mut a = args("users-role", Op::Delete);
        a.id = Some(json!(7));
        assert!(build(&a).is_err());
    }

    #[test]
    fn missing_or_unknown_fields_are_errors() {
        assert!(build(&args("users", Op::DeleteWhere)).is_err());
        assert!(build(&args("users", Op::Update)).is_err());

        let mut a = args("users", Op::Search);
        a.filter = Some(json!({"name; DROP TABLE Users": "x"}));
        assert!(build(&a).is_err());

        let mut a = args("users", Op::DeleteWhere);
        a.filter = Some(json!({}));
        assert!(build(&a).is_err());
    }

    #[test]
    fn delete_by_id_binds_the_key() {
        let mut a = args("plan", Op::Delete);
        a.id = Some(json!(3));
        let stmt = build(&a).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM Plan WHERE plan_id = $1 RETURNING *");
        assert_eq!(stmt.params, vec![Value::Int(3)]);
    }

    #[test]
    fn formats_plain_and_json() {
        let mut a = args("users", Op::Select);
        a.filter = Some(json!({"email": "a@x.com"}));
        let stmt = build(&a).unwrap();

        let plain = format_statement(&stmt, false).unwrap();
        assert_eq!(
            plain,
            "SELECT * FROM Users WHERE email = $1\n  $1 = \"a@x.com\"\n"
        );

        let parsed: serde_json::Value =
            serde_json::from_str(&format_statement(&stmt, true).unwrap()).unwrap();
        assert_eq!(parsed["sql"], "SELECT * FROM Users WHERE email = $1");
        assert_eq!(parsed["params"], json!(["a@x.com"]));
        assert_eq!(parsed["kind"], "SELECT");
    }

    #[test]
    fn describes_every_entity() {
        let lines: Vec<String> = describe_all().collect();
        assert_eq!(lines.len(), ENTITIES.len());
        assert!(lines[0].starts_with("Users (primary key user_id): user_id "));
        assert!(lines[1].starts_with("UsersRole (primary key user_id, bike_rack_id): "));
    }
}
