//! Statement execution.
//!
//! Dispatches a parsed statement against the catalog and shapes the
//! outcome into a response. Errors never escape: every failure becomes an
//! `{"ok": false, ...}` response.

use crate::table::Catalog;

use super::errors::ApiError;
use super::request::Statement;
use super::response::Response;

/// Execute one statement, shaping any failure into an error response.
pub fn execute(catalog: &Catalog, statement: Statement) -> Response {
    match run(catalog, statement) {
        Ok(response) => response,
        Err(err) => Response::error(&err),
    }
}

/// Parse and execute one wire line.
pub fn execute_line(catalog: &Catalog, line: &str) -> Response {
    match Statement::parse(line) {
        Ok(statement) => execute(catalog, statement),
        Err(err) => Response::error(&err),
    }
}

fn run(catalog: &Catalog, statement: Statement) -> Result<Response, ApiError> {
    match statement {
        Statement::CreateTable { table, schema } => {
            let created = catalog.create_table(&table, &schema)?;
            Ok(Response::ok()
                .with_table(&table)
                .with_schema(created.schema().document().clone()))
        }
        Statement::Insert { table, row } => {
            let target = catalog.get_table(&table)?;
            target.insert(&row)?;
            Ok(Response::ok().with_table(&table))
        }
        Statement::Select { table, filter } => {
            let target = catalog.get_table(&table)?;
            let rows = match filter {
                None => target.select_all()?,
                Some(clause) => target.select_where(&clause)?,
            };
            Ok(Response::ok().with_table(&table).with_result(rows))
        }
        Statement::GetById { table, id } => {
            let target = catalog.get_table(&table)?;
            let row = target.get_by_id(&id)?;
            Ok(Response::ok().with_table(&table).with_result(vec![row]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_SLOT_SIZE;
    use serde_json::json;
    use tempfile::TempDir;

    fn catalog(tmp: &TempDir) -> Catalog {
        Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE)
    }

    fn create_users(catalog: &Catalog) {
        let response = execute(
            catalog,
            Statement::CreateTable {
                table: "users".into(),
                schema: json!({
                    "properties": {
                        "id": {"type": "string"},
                        "name": {"type": "string"},
                        "age": {"type": "integer"}
                    }
                }),
            },
        );
        assert!(response.ok);
    }

    #[test]
    fn test_create_table_returns_schema() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);

        let response = execute(
            &catalog,
            Statement::CreateTable {
                table: "users".into(),
                schema: json!({"properties": {"id": {"type": "string"}}}),
            },
        );
        assert!(response.ok);
        assert_eq!(response.table.as_deref(), Some("users"));
        assert!(response.schema.is_some());
    }

    #[test]
    fn test_insert_then_select() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);
        create_users(&catalog);

        let response = execute(
            &catalog,
            Statement::Insert {
                table: "users".into(),
                row: json!({"id": "u1", "name": "Alice", "age": 30}),
            },
        );
        assert!(response.ok);

        let response = execute(
            &catalog,
            Statement::Select {
                table: "users".into(),
                filter: None,
            },
        );
        assert!(response.ok);
        assert_eq!(response.result.unwrap().len(), 1);
    }

    #[test]
    fn test_select_with_where() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);
        create_users(&catalog);

        for (id, age) in [("u1", 5), ("u2", 7)] {
            execute(
                &catalog,
                Statement::Insert {
                    table: "users".into(),
                    row: json!({"id": id, "age": age}),
                },
            );
        }

        let response = execute_line(
            &catalog,
            r#"{"stmt":"select","table":"users","where":{"column":"age","operator":"=","value":7}}"#,
        );
        assert!(response.ok);
        let rows = response.result.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "u2");
    }

    #[test]
    fn test_get_by_id() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);
        create_users(&catalog);

        execute(
            &catalog,
            Statement::Insert {
                table: "users".into(),
                row: json!({"id": "u1", "name": "Alice"}),
            },
        );

        let response = execute(
            &catalog,
            Statement::GetById {
                table: "users".into(),
                id: json!("u1"),
            },
        );
        assert!(response.ok);
        assert_eq!(response.result.unwrap()[0]["name"], "Alice");
    }

    #[test]
    fn test_errors_become_responses() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);

        let response = execute(
            &catalog,
            Statement::Select {
                table: "absent".into(),
                filter: None,
            },
        );
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "SLAB_NOT_FOUND");

        let response = execute_line(&catalog, "garbage");
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "SLAB_MALFORMED_STATEMENT");
    }

    #[test]
    fn test_duplicate_id_error_code_on_wire() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog(&tmp);
        create_users(&catalog);

        let insert = Statement::Insert {
            table: "users".into(),
            row: json!({"id": "u1"}),
        };
        assert!(execute(&catalog, insert.clone()).ok);

        let response = execute(&catalog, insert);
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "SLAB_DUPLICATE_ID");
    }
}
