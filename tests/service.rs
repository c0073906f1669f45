#[cfg(test)]
mod facade {
    use std::thread;

    use slate_engine::service::{ColumnInfo, Reply, Request, TableService};
    use slate_engine::storage::{ColumnType, ErrorKind};

    fn _column(name: &str, declared: ColumnType) -> ColumnInfo {
        ColumnInfo {
            column_name: name.to_string(),
            column_type: declared,
        }
    }

    fn _service_with_table(table: &str, columns: Vec<ColumnInfo>) -> TableService {
        let service = TableService::new();
        service.add_table(table, &columns).unwrap();
        service
    }

    fn _kind(reply: &Reply) -> ErrorKind {
        match reply {
            Reply::Error { kind, .. } => *kind,
            other => panic!("expected an error reply, got {:?}", other),
        }
    }

    #[test]
    fn create_database_resets_the_store() {
        let service = _service_with_table("People", vec![]);
        assert_eq!(service.get_tables(), vec!["People".to_string()]);

        service.create_database();

        assert!(service.get_tables().is_empty());
    }

    #[test]
    fn add_table_twice_reports_already_exists() {
        let service = _service_with_table("People", vec![]);

        let error = service.add_table("People", &[]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableAlreadyExists);
    }

    #[test]
    fn tables_list_in_creation_order() {
        let service = TableService::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            service.add_table(name, &[]).unwrap();
        }

        assert_eq!(
            service.get_tables(),
            vec!["Zeta".to_string(), "Alpha".to_string(), "Mid".to_string()]
        );
    }

    #[test]
    fn missing_table_is_reported_before_any_other_validation() {
        let service = TableService::new();

        // wrong arity too, but the missing table wins
        let error = service.add_row("Nope", &["1".to_string()]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);

        let error = service.update_table_cell("Nope", 99, "ghost", "x").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn removed_table_is_gone_for_every_operation() {
        let service = _service_with_table("People", vec![]);
        service.remove_table("People").unwrap();

        let error = service.get_columns_info("People").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);

        let error = service.remove_table("People").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn dispatch_runs_the_char_cell_scenario() {
        let service = _service_with_table("T", vec![_column("C", ColumnType::Char)]);
        service.add_new_row("T").unwrap();

        let rejected = service.dispatch(Request::UpdateTableCell {
            table_name: "T".to_string(),
            row_index: 0,
            col_name: "C".to_string(),
            value: "ab".to_string(),
        });
        assert_eq!(rejected, Reply::CellUpdate { success: false });

        let accepted = service.dispatch(Request::UpdateTableCell {
            table_name: "T".to_string(),
            row_index: 0,
            col_name: "C".to_string(),
            value: "a".to_string(),
        });
        assert_eq!(accepted, Reply::CellUpdate { success: true });

        let rows = service.display_table("T").unwrap();
        assert_eq!(rows[0].get("C"), Some(&"a".to_string()));
    }

    #[test]
    fn dispatch_folds_engine_errors_into_the_envelope() {
        let service = TableService::new();

        let reply = service.dispatch(Request::DeleteRow {
            table_name: "Nope".to_string(),
            row_index: 0,
        });
        assert_eq!(_kind(&reply), ErrorKind::TableNotFound);

        let service = _service_with_table("People", vec![_column("Name", ColumnType::String)]);
        let reply = service.dispatch(Request::DeleteRow {
            table_name: "People".to_string(),
            row_index: 0,
        });
        assert_eq!(_kind(&reply), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn display_table_renders_unset_cells_as_empty_strings() {
        let service = _service_with_table(
            "People",
            vec![
                _column("Name", ColumnType::String),
                _column("Age", ColumnType::Integer),
            ],
        );
        service.add_new_row("People").unwrap();

        let rows = service.display_table("People").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Name"), Some(&"".to_string()));
        assert_eq!(rows[0].get("Age"), Some(&"".to_string()));
    }

    #[test]
    fn remove_duplicates_reports_exactly_the_removed_count() {
        let service = _service_with_table("Log", vec![_column("Msg", ColumnType::String)]);
        for message in ["a", "a", "b", "a"] {
            service.add_row("Log", &[message.to_string()]).unwrap();
        }

        assert_eq!(service.remove_duplicates("Log").unwrap(), 2);
        assert_eq!(service.display_table("Log").unwrap().len(), 2);
        assert_eq!(service.remove_duplicates("Log").unwrap(), 0);
    }

    #[test]
    fn concurrent_row_inserts_lose_nothing() {
        let service = _service_with_table("Events", vec![_column("Id", ColumnType::Integer)]);

        let mut handles = vec![];
        for worker in 0..4u32 {
            let service = service.clone();
            handles.push(thread::spawn(move || {
                for i in 0..50u32 {
                    service
                        .add_row("Events", &[format!("{}", worker * 100 + i)])
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(service.display_table("Events").unwrap().len(), 200);
    }

    #[test]
    fn concurrent_schema_and_row_mutations_keep_rows_aligned() {
        let service = _service_with_table("Mixed", vec![]);

        let mut handles = vec![];
        for worker in 0..4u32 {
            let service = service.clone();
            handles.push(thread::spawn(move || {
                for i in 0..25u32 {
                    service
                        .add_column(
                            "Mixed",
                            &ColumnInfo {
                                column_name: format!("c{}_{}", worker, i),
                                column_type: ColumnType::String,
                            },
                        )
                        .unwrap();
                    service.add_new_row("Mixed").unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let width = service.get_columns_info("Mixed").unwrap().len();
        assert_eq!(width, 100);
        let rows = service.display_table("Mixed").unwrap();
        assert_eq!(rows.len(), 100);
        for row in rows {
            assert_eq!(row.len(), width);
        }
    }
}

#[cfg(test)]
mod protocol {
    use slate_engine::service::{ColumnInfo, Reply, Request};
    use slate_engine::storage::{ColumnType, ErrorKind};

    #[test]
    fn requests_serialize_with_the_original_field_names() {
        let request = Request::UpdateTableCell {
            table_name: "People".to_string(),
            row_index: 3,
            col_name: "Name".to_string(),
            value: "Jansen".to_string(),
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["op"], "UpdateTableCell");
        assert_eq!(encoded["tableName"], "People");
        assert_eq!(encoded["rowIndex"], 3);
        assert_eq!(encoded["colName"], "Name");
        assert_eq!(encoded["value"], "Jansen");
    }

    #[test]
    fn column_descriptors_use_pascal_case_fields() {
        let column = ColumnInfo {
            column_name: "Age".to_string(),
            column_type: ColumnType::Integer,
        };

        let encoded = serde_json::to_value(&column).unwrap();
        assert_eq!(encoded["ColumnName"], "Age");
        assert_eq!(encoded["ColumnType"], "Integer");
    }

    #[test]
    fn client_json_parses_into_a_request() {
        let line = r#"{"op":"AddTable","tableName":"People","columnInfo":[{"ColumnName":"Name","ColumnType":"String"}]}"#;
        let request: Request = serde_json::from_str(line).unwrap();

        assert_eq!(
            request,
            Request::AddTable {
                table_name: "People".to_string(),
                column_info: vec![ColumnInfo {
                    column_name: "Name".to_string(),
                    column_type: ColumnType::String,
                }],
            }
        );
    }

    #[test]
    fn unknown_column_types_fail_to_parse() {
        let line = r#"{"op":"AddColumn","tableName":"People","columnInfo":{"ColumnName":"Z","ColumnType":"Complex"}}"#;
        assert!(serde_json::from_str::<Request>(&line).is_err());
    }

    #[test]
    fn the_error_envelope_round_trips() {
        let reply = Reply::Error {
            kind: ErrorKind::TableNotFound,
            message: "Table \"People\" not found.".to_string(),
        };

        let encoded = serde_json::to_string(&reply).unwrap();
        assert!(encoded.contains("\"result\":\"error\""));
        assert!(encoded.contains("\"kind\":\"TableNotFound\""));

        let decoded: Reply = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, reply);
    }
}

#[cfg(test)]
mod transport {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use slate_engine::server::handle_connection;
    use slate_engine::service::{Reply, TableService};
    use slate_engine::storage::ErrorKind;

    fn _spawn_server(service: TableService) -> (std::net::SocketAddr, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, service);
        });
        (address, handle)
    }

    #[test]
    fn requests_round_trip_over_tcp() {
        let service = TableService::new();
        let (address, handle) = _spawn_server(service.clone());

        let stream = TcpStream::connect(address).unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        let mut send = |line: &str| -> Reply {
            writeln!(writer, "{}", line).unwrap();
            let mut reply = String::new();
            reader.read_line(&mut reply).unwrap();
            serde_json::from_str(&reply).unwrap()
        };

        let reply = send(
            r#"{"op":"AddTable","tableName":"People","columnInfo":[{"ColumnName":"Name","ColumnType":"String"}]}"#,
        );
        assert_eq!(reply, Reply::Ok);

        let reply = send(r#"{"op":"AddRow","tableName":"People","values":["Jansen"]}"#);
        assert_eq!(reply, Reply::Ok);

        let reply = send(r#"{"op":"GetTables"}"#);
        assert_eq!(
            reply,
            Reply::Tables {
                tables: vec!["People".to_string()]
            }
        );

        let reply = send(r#"{"op":"DisplayTable","tableName":"People"}"#);
        match reply {
            Reply::Rows { rows } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].get("Name"), Some(&"Jansen".to_string()));
            }
            other => panic!("expected rows, got {:?}", other),
        }

        // the same store is visible outside the transport
        assert_eq!(service.get_tables(), vec!["People".to_string()]);

        drop(send);
        drop(writer);
        drop(reader);
        handle.join().unwrap();
    }

    #[test]
    fn a_malformed_line_gets_bad_request_and_keeps_the_connection() {
        let (address, handle) = _spawn_server(TableService::new());

        let stream = TcpStream::connect(address).unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        writeln!(writer, "this is not json").unwrap();
        let mut reply = String::new();
        reader.read_line(&mut reply).unwrap();
        let reply: Reply = serde_json::from_str(&reply).unwrap();
        match reply {
            Reply::Error { kind, .. } => assert_eq!(kind, ErrorKind::BadRequest),
            other => panic!("expected a BadRequest error, got {:?}", other),
        }

        // the connection survives a bad line
        writeln!(writer, r#"{{"op":"GetTables"}}"#).unwrap();
        let mut reply = String::new();
        reader.read_line(&mut reply).unwrap();
        let reply: Reply = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply, Reply::Tables { tables: vec![] });

        drop(writer);
        drop(reader);
        handle.join().unwrap();
    }
}
