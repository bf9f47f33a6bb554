// Author: Dustin Pilgrim
// License: MIT

use indexmap::IndexMap;

/// Key of an entry-data table. `1` and `'1'` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKey {
    Int(i64),
    Str(String),
}

pub type Table = IndexMap<TableKey, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Table(Table),
    /// Never produced by the parser; only built by hand for the formatter.
    Array(Vec<Value>),
}

/// A parsed `entry_data.ini` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub config: Table,                        // [#CONFIG]
    pub sections: IndexMap<String, Table>,    // ['name'] blocks in file order
}

impl TableKey {
    /// Ordering used by the formatter: string keys first, then integer keys.
    pub fn sort_key(&self) -> (bool, i64, &str) {
        match self {
            TableKey::Int(i) => (true, *i, ""),
            TableKey::Str(s) => (false, 0, s.as_str()),
        }
    }
}

impl From<&str> for TableKey {
    fn from(s: &str) -> Self {
        TableKey::Str(s.to_string())
    }
}

impl From<i64> for TableKey {
    fn from(i: i64) -> Self {
        TableKey::Int(i)
    }
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        if let Value::Table(t) = self {
            Some(t)
        } else {
            None
        }
    }

    /// Int or Float. Bool does not count.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Look up a string key; missing keys are `None`, never an error.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|t| lookup(t, key))
    }
}

/// Look up a string key in a table.
pub fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    table.get(&TableKey::Str(key.to_string()))
}

/// Look up a string key whose value is itself a table.
pub fn lookup_table<'a>(table: &'a Table, key: &str) -> Option<&'a Table> {
    lookup(table, key).and_then(Value::as_table)
}

impl Document {
    pub fn section(&self, name: &str) -> Option<&Table> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }
}
