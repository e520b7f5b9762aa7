#[cfg(test)]
mod tests {
    use crate::pipeline::retrieve::Retriever;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const REVIEWS: &str = "\
Restaurant_ID,Restaurant_Name,Rating,Weather_Condition,Revenue
r1,Cafe Luna,4.5,Sunny,120
r2,Taco Verde,4.0,Rainy,80
";

    const SALES: &str = "\
restaurant_id,restaurant_name,category,item_name,revenue,date
r1,Cafe Luna,Drinks,Latte,100,2024-01-05
r1,Cafe Luna,Mains,Pasta,300,2024-02-10
r2,Taco Verde,Mains,Taco,50,2024-01-08
";

    fn fixtures(dir: &TempDir) -> (PathBuf, PathBuf) {
        let entity = dir.path().join("reviews.csv");
        let transaction = dir.path().join("sales.csv");
        fs::write(&entity, REVIEWS).unwrap();
        fs::write(&transaction, SALES).unwrap();
        (entity, transaction)
    }

    #[test]
    fn test_query_without_entity_returns_full_join() {
        let dir = TempDir::new().unwrap();
        let (entity, transaction) = fixtures(&dir);

        let joined = Retriever::new(entity, transaction)
            .query("overall sales overview")
            .unwrap();

        assert_eq!(joined.detected_entity, None);
        // 左连接完整性：每条交易记录至少有一行输出
        assert_eq!(joined.table.len(), 3);
        // 实体侧列已追加，重名列带后缀
        assert!(joined.table.has_column("rating"));
        assert!(joined.table.has_column("revenue_entity"));
        assert_eq!(joined.table.value(0, "rating"), Some("4.5"));
    }

    #[test]
    fn test_query_with_entity_filters_both_tables() {
        let dir = TempDir::new().unwrap();
        let (entity, transaction) = fixtures(&dir);

        let joined = Retriever::new(entity, transaction)
            .query("How is Cafe Luna performing this quarter?")
            .unwrap();

        assert_eq!(joined.detected_entity, Some("Cafe Luna".to_string()));
        assert_eq!(joined.table.len(), 2);
        for idx in 0..joined.table.len() {
            let name = joined.table.value(idx, "restaurant_name").unwrap();
            assert_eq!(name.to_lowercase(), "cafe luna");
        }
    }

    #[test]
    fn test_entity_detection_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let (entity, transaction) = fixtures(&dir);

        let joined = Retriever::new(entity, transaction)
            .query("compare TACO VERDE against the market")
            .unwrap();

        assert_eq!(joined.detected_entity, Some("Taco Verde".to_string()));
        assert_eq!(joined.table.len(), 1);
    }

    #[test]
    fn test_transaction_table_without_name_column_stays_unfiltered() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("reviews.csv");
        let transaction = dir.path().join("sales.csv");
        fs::write(
            &entity,
            "restaurant_id,restaurant_name,rating\nr1,Cafe Luna,4.5\nr2,Taco Verde,4.0\n",
        )
        .unwrap();
        // 交易表只有标识列，没有名称列
        fs::write(
            &transaction,
            "restaurant_id,category,revenue\nr1,Drinks,100\nr2,Mains,50\n",
        )
        .unwrap();

        let joined = Retriever::new(entity, transaction)
            .query("How is Cafe Luna performing?")
            .unwrap();

        assert_eq!(joined.detected_entity, Some("Cafe Luna".to_string()));
        // 交易表保持原样，两条记录都在
        assert_eq!(joined.table.len(), 2);
        // 实体表已过滤：命中的实体有匹配，其余行实体侧为空
        assert_eq!(joined.table.value(0, "restaurant_name"), Some("Cafe Luna"));
        assert_eq!(joined.table.value(0, "rating"), Some("4.5"));
        assert_eq!(joined.table.value(1, "restaurant_name"), None);
        assert_eq!(joined.table.value(1, "rating"), None);
    }

    #[test]
    fn test_join_falls_back_to_name_column() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("reviews.csv");
        let transaction = dir.path().join("sales.csv");
        fs::write(&entity, "restaurant_name,rating\nCafe Luna,4.5\n").unwrap();
        fs::write(
            &transaction,
            "restaurant_name,revenue\nCafe Luna,100\nCafe Luna,300\n",
        )
        .unwrap();

        let joined = Retriever::new(entity, transaction).query("").unwrap();
        assert_eq!(joined.table.len(), 2);
        assert_eq!(joined.table.value(0, "rating"), Some("4.5"));
    }

    #[test]
    fn test_no_join_key_returns_unjoined_transactions() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("reviews.csv");
        let transaction = dir.path().join("sales.csv");
        fs::write(&entity, "restaurant_name,rating\nCafe Luna,4.5\n").unwrap();
        fs::write(&transaction, "category,revenue\nDrinks,100\n").unwrap();

        let joined = Retriever::new(entity, transaction).query("").unwrap();
        assert_eq!(joined.table.len(), 1);
        assert!(joined.entity_columns.is_empty());
        assert!(!joined.table.has_column("rating"));
    }

    #[test]
    fn test_missing_input_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("absent.csv");
        let transaction = dir.path().join("sales.csv");
        fs::write(&transaction, "category,revenue\nDrinks,100\n").unwrap();

        let result = Retriever::new(entity, transaction).query("");
        assert!(result.is_err());
    }
}
