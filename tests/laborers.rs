#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sitelog::db::attendance::{AttendanceRecords, NewAttendance};
    use sitelog::db::db::Db;
    use sitelog::db::laborers::{Laborers, NewLaborer};
    use sitelog::db::payments::{NewPayment, Payments};
    use sitelog::db::sites::{NewSite, Sites};
    use sitelog::libs::pagination::PageParams;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct LaborerTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for LaborerTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::init(&temp_dir.path().join("labour_management.db")).unwrap();
            LaborerTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn laborer(name: &str) -> NewLaborer {
        NewLaborer {
            name: name.to_string(),
            age: 30,
            gender: "Male".to_string(),
            daily_wage: 600.0,
            date_of_joining: date(2024, 1, 15),
        }
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_create_then_get_returns_same_fields(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        let created = laborers.insert(&laborer("Ravi Kumar")).unwrap();

        let fetched = laborers.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Ravi Kumar");
        assert_eq!(fetched.date_of_joining, date(2024, 1, 15));
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_missing_laborer_is_none(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        assert!(laborers.get(42).unwrap().is_none());
        assert!(laborers.update(42, &laborer("Nobody")).unwrap().is_none());
        assert!(!laborers.delete(42).unwrap());
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_pages_do_not_overlap(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        for i in 0..5 {
            laborers.insert(&laborer(&format!("Worker {}", i))).unwrap();
        }

        let first = laborers.list(PageParams::new(0, 2)).unwrap();
        let second = laborers.list(PageParams::new(2, 2)).unwrap();
        let last = laborers.list(PageParams::new(4, 2)).unwrap();

        assert_eq!(first.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(), ["Worker 0", "Worker 1"]);
        assert_eq!(second.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(), ["Worker 2", "Worker 3"]);
        assert_eq!(last.len(), 1);
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_search_is_case_insensitive_substring(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        laborers.insert(&laborer("Ravi Kumar")).unwrap();
        laborers.insert(&laborer("Suresh Kumar")).unwrap();
        laborers.insert(&laborer("Anil")).unwrap();

        assert_eq!(laborers.search("KUMAR").unwrap().len(), 2);
        assert_eq!(laborers.search("ravi").unwrap()[0].name, "Ravi Kumar");
        assert!(laborers.search("%").unwrap().is_empty());
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_search_finds_non_ascii_names(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        laborers.insert(&laborer("Émile Zola")).unwrap();
        laborers.insert(&laborer("Jürgen")).unwrap();

        assert_eq!(laborers.search("Émile").unwrap()[0].name, "Émile Zola");
        assert_eq!(laborers.search("émile zola").unwrap().len(), 0);
        assert_eq!(laborers.search("ZOLA").unwrap().len(), 1);
        assert_eq!(laborers.search("ür").unwrap()[0].name, "Jürgen");
        assert_eq!(laborers.search("JÜRGEN").unwrap().len(), 0);
        assert_eq!(laborers.search("jüRGEN").unwrap().len(), 1);
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_search_treats_wildcards_literally(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        laborers.insert(&laborer("50% Crew")).unwrap();
        laborers.insert(&laborer("500 Crew")).unwrap();
        laborers.insert(&laborer("A_B")).unwrap();
        laborers.insert(&laborer("AxB")).unwrap();

        let found = laborers.search("50%").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "50% Crew");

        let found = laborers.search("a_b").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A_B");
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_update_replaces_every_field(ctx: &mut LaborerTestContext) {
        let laborers = Laborers::new(&ctx.db.conn);
        let created = laborers.insert(&laborer("Ravi")).unwrap();

        let replacement = NewLaborer {
            name: "Ravi K.".to_string(),
            age: 31,
            gender: "M".to_string(),
            daily_wage: 700.0,
            date_of_joining: date(2023, 6, 1),
        };
        let updated = laborers.update(created.id, &replacement).unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, 31);
        assert_eq!(updated.daily_wage, 700.0);
        assert_eq!(updated.date_of_joining, date(2023, 6, 1));
    }

    #[test_context(LaborerTestContext)]
    #[test]
    fn test_delete_cascades_to_attendance_and_payments(ctx: &mut LaborerTestContext) {
        let conn = &ctx.db.conn;
        let laborers = Laborers::new(conn);
        let attendance = AttendanceRecords::new(conn);
        let payments = Payments::new(conn);

        let ravi = laborers.insert(&laborer("Ravi")).unwrap();
        let anil = laborers.insert(&laborer("Anil")).unwrap();
        let site = Sites::new(conn)
            .insert(&NewSite {
                name: "Tower A".to_string(),
                location: None,
            })
            .unwrap();

        for laborer_id in [ravi.id, ravi.id, anil.id] {
            attendance
                .insert(
                    laborer_id,
                    &NewAttendance {
                        laborer_id: None,
                        date: date(2024, 5, 2),
                        present: "Present".to_string(),
                        hours_worked: 8.0,
                        site_name: "Tower A".to_string(),
                    },
                )
                .unwrap();
        }
        payments
            .insert(&NewPayment {
                amount: 1200.0,
                date: date(2024, 5, 3),
                labor_id: ravi.id,
                site_id: site.id,
                material_name: None,
                description: Some("Two days".to_string()),
            })
            .unwrap();

        assert!(laborers.delete(ravi.id).unwrap());

        assert!(attendance.list_by_laborer(ravi.id).unwrap().is_empty());
        assert_eq!(attendance.count().unwrap(), 1);
        assert_eq!(payments.count().unwrap(), 0);
        assert!(laborers.get(anil.id).unwrap().is_some());
    }

    #[test]
    fn test_numeric_fields_accept_strings() {
        let body = r#"{"name": "Ravi", "age": "30", "gender": "Male", "daily_wage": "650.50", "date_of_joining": "2024-01-15"}"#;
        let parsed: NewLaborer = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.age, 30);
        assert_eq!(parsed.daily_wage, 650.5);
    }
}
