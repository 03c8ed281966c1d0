#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::{NewContact, NewInstallation};
    use crate::repository::{contacts, installations, PageRequest};
    use crate::tests::test_pool;

    fn new_contact(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            zip_code: "0000AA".to_string(),
            city: "Arnhem".to_string(),
            house_number: "1".to_string(),
        }
    }

    fn new_installation(name: &str, output_power: f64) -> NewInstallation {
        NewInstallation { name: name.to_string(), output_power }
    }

    #[tokio::test]
    async fn test_init_db() {
        let pool = test_pool().await;

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert!(tables.contains(&"contacts".to_string()));
        assert!(tables.contains(&"production_installations".to_string()));

        let indexes: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='index'")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert!(indexes.contains(&"idx_installations_name".to_string()));
        assert!(indexes.contains(&"idx_installations_output_power".to_string()));
    }

    #[tokio::test]
    async fn test_init_db_is_idempotent() {
        let pool = test_pool().await;
        contacts::insert(&pool, &new_contact("kept")).await.unwrap();

        db::init_db(&pool).await.unwrap();

        assert!(contacts::find_by_id(&pool, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_contact_crud() {
        let pool = test_pool().await;

        let created = contacts::insert(&pool, &new_contact("First")).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(contacts::exists(&pool, 1).await.unwrap());

        let updated = contacts::update(&pool, 1, &new_contact("Renamed")).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(contacts::update(&pool, 2, &new_contact("x")).await.unwrap().is_none());

        assert!(contacts::delete(&pool, 1).await.unwrap());
        assert!(!contacts::delete(&pool, 1).await.unwrap());
        assert!(!contacts::exists(&pool, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_contact_columns_reject_blank_values() {
        let pool = test_pool().await;
        let result = contacts::insert(&pool, &new_contact("   ")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_find_page() {
        let pool = test_pool().await;
        for i in 0..5 {
            contacts::insert(&pool, &new_contact(&format!("c{}", i))).await.unwrap();
        }
        let rest = crate::config::AppConfig::default().rest;
        let request = PageRequest::from_query(Some("page=2&size=2"), &rest, contacts::SORT_COLUMNS).unwrap();

        let page = contacts::find_page(&pool, &request).await.unwrap();

        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "c4");
    }

    #[tokio::test]
    async fn test_installation_contact_link() {
        let pool = test_pool().await;
        let contact = contacts::insert(&pool, &new_contact("Owner")).await.unwrap();
        let installation =
            installations::insert(&pool, &new_installation("Roof", 1.0), Some(contact.id)).await.unwrap();
        assert_eq!(installation.contact_id, Some(contact.id));

        let linked = installations::find_contact(&pool, installation.id).await.unwrap().unwrap();
        assert_eq!(linked, contact);

        // One contact, one installation.
        let second = installations::insert(&pool, &new_installation("Barn", 2.0), Some(contact.id)).await;
        assert!(second.is_err());

        // Restricted while linked.
        assert!(contacts::delete(&pool, contact.id).await.is_err());

        assert!(installations::set_contact(&pool, installation.id, None).await.unwrap());
        assert!(installations::find_contact(&pool, installation.id).await.unwrap().is_none());
        assert!(!installations::set_contact(&pool, 99, None).await.unwrap());
        assert!(contacts::delete(&pool, contact.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_output_power_check_constraint() {
        let pool = test_pool().await;
        assert!(installations::insert(&pool, &new_installation("x", 0.0), None).await.is_err());
        assert!(installations::insert(&pool, &new_installation("x", 1_000_000.0), None).await.is_err());
        assert!(installations::insert(&pool, &new_installation("x", 0.0001), None).await.is_ok());
        assert!(installations::insert(&pool, &new_installation("x", 999_999.0), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_derived_queries() {
        let pool = test_pool().await;
        installations::insert(&pool, &new_installation("Roof", 5.0), None).await.unwrap();
        installations::insert(&pool, &new_installation("ROOF", 6.0), None).await.unwrap();
        installations::insert(&pool, &new_installation("Roof", 7.0), None).await.unwrap();

        let by_name = installations::find_all_by_name(&pool, "Roof").await.unwrap();
        assert_eq!(by_name.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);

        let between = installations::find_all_by_output_power_between(&pool, 5.0, 6.0).await.unwrap();
        assert_eq!(between.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);

        let none = installations::find_all_by_output_power_between(&pool, 6.5, 6.9).await.unwrap();
        assert!(none.is_empty());
    }
}
