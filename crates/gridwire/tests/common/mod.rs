//! Wire-query builder shared by the integration tests: assembles the exact
//! query string the widget sends, bracketed keys and all.
#![allow(dead_code)]

pub struct WireQuery {
    pairs: Vec<(String, String)>,
    columns: usize,
}

impl WireQuery {
    #[must_use]
    pub fn new(draw: u64) -> Self {
        Self {
            pairs: vec![
                ("draw".to_string(), draw.to_string()),
                ("start".to_string(), "0".to_string()),
                ("length".to_string(), "10".to_string()),
                ("search[value]".to_string(), String::new()),
                ("search[regex]".to_string(), "false".to_string()),
                ("_".to_string(), "1504864069".to_string()),
            ],
            columns: 0,
        }
    }

    fn set(&mut self, key: &str, value: String) {
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| k == key) {
            pair.1 = value;
        } else {
            self.pairs.push((key.to_string(), value));
        }
    }

    #[must_use]
    pub fn page(mut self, start: u64, length: i64) -> Self {
        self.set("start", start.to_string());
        self.set("length", length.to_string());
        self
    }

    #[must_use]
    pub fn search(mut self, value: &str) -> Self {
        self.set("search[value]", value.to_string());
        self
    }

    #[must_use]
    pub fn column(mut self, data: &str) -> Self {
        let i = self.columns;
        self.set(&format!("columns[{i}][data]"), data.to_string());
        self.set(&format!("columns[{i}][name]"), String::new());
        self.set(&format!("columns[{i}][searchable]"), "true".to_string());
        self.set(&format!("columns[{i}][orderable]"), "true".to_string());
        self.set(&format!("columns[{i}][search][value]"), String::new());
        self.set(&format!("columns[{i}][search][regex]"), "false".to_string());
        self.columns += 1;
        self
    }

    #[must_use]
    pub fn column_search(mut self, index: usize, value: &str) -> Self {
        self.set(&format!("columns[{index}][search][value]"), value.to_string());
        self
    }

    #[must_use]
    pub fn order(mut self, column: usize, dir: &str) -> Self {
        let i = self
            .pairs
            .iter()
            .filter(|(k, _)| k.starts_with("order[") && k.ends_with("][column]"))
            .count();
        self.set(&format!("order[{i}][column]"), column.to_string());
        self.set(&format!("order[{i}][dir]"), dir.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}
