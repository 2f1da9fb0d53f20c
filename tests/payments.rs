#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sitelog::db::db::Db;
    use sitelog::db::laborers::{Laborer, Laborers, NewLaborer};
    use sitelog::db::payments::{NewPayment, Payments};
    use sitelog::db::sites::{NewSite, Site, Sites};
    use sitelog::libs::error::AppError;
    use sitelog::libs::messages::Message;
    use sitelog::libs::pagination::PageParams;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct PaymentTestContext {
        _temp_dir: TempDir,
        db: Db,
        laborer: Laborer,
        site: Site,
    }

    impl TestContext for PaymentTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::init(&temp_dir.path().join("labour_management.db")).unwrap();
            let laborer = Laborers::new(&db.conn)
                .insert(&NewLaborer {
                    name: "Ravi".to_string(),
                    age: 35,
                    gender: "Male".to_string(),
                    daily_wage: 700.0,
                    date_of_joining: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
                })
                .unwrap();
            let site = Sites::new(&db.conn)
                .insert(&NewSite {
                    name: "Block C".to_string(),
                    location: None,
                })
                .unwrap();
            PaymentTestContext {
                _temp_dir: temp_dir,
                db,
                laborer,
                site,
            }
        }
    }

    fn payment(ctx: &PaymentTestContext, amount: f64) -> NewPayment {
        NewPayment {
            amount,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            labor_id: ctx.laborer.id,
            site_id: ctx.site.id,
            material_name: Some("Cement".to_string()),
            description: None,
        }
    }

    #[test_context(PaymentTestContext)]
    #[test]
    fn test_payment_carries_names(ctx: &mut PaymentTestContext) {
        let payments = Payments::new(&ctx.db.conn);
        let created = payments.insert(&payment(ctx, 1400.0)).unwrap();

        assert_eq!(created.labor_name, "Ravi");
        assert_eq!(created.site_name, "Block C");
        assert_eq!(payments.get(created.id).unwrap().unwrap(), created);
    }

    #[test_context(PaymentTestContext)]
    #[test]
    fn test_payment_requires_laborer_and_site(ctx: &mut PaymentTestContext) {
        let payments = Payments::new(&ctx.db.conn);

        let mut bad = payment(ctx, 100.0);
        bad.labor_id += 50;
        assert!(matches!(payments.insert(&bad).unwrap_err(), AppError::NotFound(Message::LaborerNotFound)));

        let mut bad = payment(ctx, 100.0);
        bad.site_id += 50;
        assert!(matches!(payments.insert(&bad).unwrap_err(), AppError::NotFound(Message::SiteNotFound)));

        assert_eq!(payments.count().unwrap(), 0);
    }

    #[test_context(PaymentTestContext)]
    #[test]
    fn test_update_list_and_delete(ctx: &mut PaymentTestContext) {
        let payments = Payments::new(&ctx.db.conn);
        let first = payments.insert(&payment(ctx, 500.0)).unwrap();
        payments.insert(&payment(ctx, 600.0)).unwrap();

        let mut changed = payment(ctx, 550.0);
        changed.material_name = None;
        changed.description = Some("Advance".to_string());
        let updated = payments.update(first.id, &changed).unwrap().unwrap();
        assert_eq!(updated.amount, 550.0);
        assert_eq!(updated.material_name, None);
        assert_eq!(updated.description.as_deref(), Some("Advance"));

        let page = payments.list(PageParams::new(1, 10)).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].amount, 600.0);

        assert!(payments.delete(first.id).unwrap());
        assert!(!payments.delete(first.id).unwrap());
        assert!(payments.update(first.id, &changed).unwrap().is_none());
        assert_eq!(payments.count().unwrap(), 1);
    }

    #[test_context(PaymentTestContext)]
    #[test]
    fn test_site_with_payments_cannot_be_deleted(ctx: &mut PaymentTestContext) {
        Payments::new(&ctx.db.conn).insert(&payment(ctx, 500.0)).unwrap();

        let err = Sites::new(&ctx.db.conn).delete(ctx.site.id).unwrap_err();
        assert!(matches!(err, AppError::Conflict(Message::SiteInUse { materials: 0, payments: 1 })));
    }
}
