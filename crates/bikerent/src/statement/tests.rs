use super::*;
use crate::error::DbError;
use crate::schema::{
    BikeRack, BikeRackColumn, Client, Plan, PlanColumn, Rent, RentColumn, Review, UserColumn,
    Users,
};

#[test]
fn test_select_all() {
    let stmt = select_all::<Users>();
    assert_eq!(stmt.sql, "SELECT * FROM Users");
    assert!(stmt.params.is_empty());
    assert_eq!(stmt.kind, StatementKind::Select);
}

#[test]
fn test_select_where() {
    let filter = Mapping::new()
        .with(UserColumn::Email, "a@x.com")
        .with(UserColumn::Cpf, "111");
    let stmt = select_where::<Users>(&filter).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM Users WHERE email = $1 AND cpf = $2"
    );
    assert_eq!(stmt.params_ref().len(), 2);
}

#[test]
fn test_select_where_empty_never_emits_bare_where() {
    let filter = Mapping::<UserColumn>::new();
    let err = select_where::<Users>(&filter).unwrap_err();
    assert!(matches!(err, DbError::EmptyMapping { .. }));
}

#[test]
fn test_search_text() {
    let filter = Mapping::new().with(BikeRackColumn::Name, "%bike%");
    let stmt = search_text::<BikeRack>(&filter).unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM BikeRack WHERE name ILIKE $1");
}

#[test]
fn test_select_by_id() {
    let stmt = select_by_id::<Review>(7);
    assert_eq!(stmt.sql, "SELECT * FROM reviews WHERE id = $1");
    assert_eq!(stmt.params, vec![Value::Int(7)]);
}

#[test]
fn test_update_by_id_appends_primary_key() {
    let update = Mapping::new().with(UserColumn::Name, "Bob");
    let stmt = update_by_id::<Users>(&update, 5).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE Users SET name = $1 WHERE user_id = $2 RETURNING *"
    );
    assert_eq!(stmt.params, vec![Value::from("Bob"), Value::Int(5)]);
    assert_eq!(stmt.kind, StatementKind::Update);
}

#[test]
fn test_update_where_orders_set_before_where() {
    let update = Mapping::new()
        .with(PlanColumn::Price, 29.99)
        .with(PlanColumn::Active, true);
    let filter = Mapping::new()
        .with(PlanColumn::PlanId, 3)
        .with(PlanColumn::BikeRackId, 1);
    let stmt = update_where::<Plan>(&update, &filter).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE Plan SET price = $1, active = $2 WHERE plan_id = $3 AND bike_rack_id = $4 RETURNING *"
    );
    assert_eq!(
        stmt.params,
        vec![
            Value::Float(29.99),
            Value::Bool(true),
            Value::Int(3),
            Value::Int(1)
        ]
    );
}

#[test]
fn test_update_where_rejects_empty_sides() {
    let update = Mapping::new().with(RentColumn::Status, "canceled");
    let empty = Mapping::<RentColumn>::new();
    assert!(matches!(
        update_where::<Rent>(&update, &empty),
        Err(DbError::EmptyMapping {
            op: "build_where_clause"
        })
    ));
    assert!(matches!(
        update_where::<Rent>(&empty, &update),
        Err(DbError::EmptyMapping {
            op: "build_set_clause"
        })
    ));
}

#[test]
fn test_insert() {
    let row = Mapping::new()
        .with(RentColumn::InitTime, "2025-09-30 16:30:00")
        .with(RentColumn::TotalValue, 10.5)
        .with(RentColumn::Status, "active");
    let stmt = insert::<Rent>(&row).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO Rent (init_time, total_value, status) VALUES ($1, $2, $3) RETURNING *"
    );
    assert_eq!(stmt.kind, StatementKind::Insert);
}

#[test]
fn test_delete_statements() {
    assert_eq!(
        delete_by_id::<Client>(4).sql,
        "DELETE FROM Client WHERE client_id = $1 RETURNING *"
    );
    assert_eq!(delete_all::<Client>().sql, "DELETE FROM Client RETURNING *");

    let filter = Mapping::new().with(UserColumn::Phone, "123");
    let stmt = delete_where::<Users>(&filter).unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM Users WHERE phone = $1 RETURNING *"
    );
    assert_eq!(stmt.kind, StatementKind::Delete);
}

#[test]
fn test_statements_are_deterministic() {
    let update = Mapping::new().with(UserColumn::Name, "Bob");
    let filter = Mapping::new().with(UserColumn::UserId, 5);
    assert_eq!(
        update_where::<Users>(&update, &filter).unwrap(),
        update_where::<Users>(&update, &filter).unwrap()
    );
}
