use crate::error::{XeError, XeResult};
use crate::types::ObjectId;

// Records are separated by two blank lines; the first field is the uuid.
const RECORD_DELIMITER: &str = "\n\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    fields: Vec<(String, String)>,
}

impl InventoryRecord {
    pub fn id(&self) -> XeResult<ObjectId> {
        let (key, value) = self
            .fields
            .first()
            .ok_or_else(|| XeError::Malformed("empty record".to_string()))?;
        value
            .parse::<ObjectId>()
            .map_err(|e| XeError::Malformed(format!("{}: {}", key, e)))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn parse_records(output: &str) -> XeResult<Vec<InventoryRecord>> {
    let normalized = output.replace("\r\n", "\n");
    let mut records = Vec::new();
    for chunk in normalized.split(RECORD_DELIMITER) {
        let chunk = chunk.trim_matches('\n');
        if chunk.trim().is_empty() {
            continue;
        }
        records.push(parse_record(chunk)?);
    }
    Ok(records)
}

fn parse_record(chunk: &str) -> XeResult<InventoryRecord> {
    let mut fields = Vec::new();
    for (idx, line) in chunk.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => fields.push((normalize_key(key), value.trim().to_string())),
            None if idx == 0 => {
                return Err(XeError::Malformed(format!("record without key: {}", line)));
            }
            None => {}
        }
    }
    Ok(InventoryRecord { fields })
}

fn normalize_key(raw: &str) -> String {
    let key = match raw.find('(') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    key.trim().to_string()
}

pub fn parse_ids(output: &str) -> XeResult<Vec<ObjectId>> {
    parse_records(output)?
        .iter()
        .map(InventoryRecord::id)
        .collect()
}

pub fn parse_value(output: &str) -> String {
    output.trim_end_matches(['\r', '\n']).to_string()
}
