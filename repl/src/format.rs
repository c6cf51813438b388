//! Output formatting utilities for the REPL.

use eql_core::{Entity, PropertyType, Value};
use eql_registry::EntityDef;

use crate::Record;

/// Format a value for display.
pub fn format_value(v: &Value) -> String {
    match v {
        Value::Text(s) => format!("\"{}\"", s),
        Value::Ref(r) => format!("{}#{}", r.entity, format_id(&r.id)),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

fn format_id(id: &Value) -> String {
    match id.identity() {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format a declared type the way datasets spell it.
pub fn format_type(t: &PropertyType) -> String {
    match t {
        PropertyType::Enum(e) => format!("{} {:?}", e.name, e.constants),
        PropertyType::Collection(element) => format!("list of {}", format_type(element)),
        other => other.to_string(),
    }
}

/// Format a record as `Entity id {property: value, ...}`, properties in
/// declaration order.
pub fn format_record(def: &EntityDef, record: &Record) -> String {
    let properties: Vec<String> = def
        .properties()
        .filter(|p| p.name != def.id_property)
        .map(|p| format!("{}: {}", p.name, format_value(&record.value_of(&p.name))))
        .collect();
    format!(
        "{} {} {{{}}}",
        def.name,
        format_id(&record.value_of(&def.id_property)),
        properties.join(", ")
    )
}

/// Print help information.
pub fn print_help() {
    println!("EQL REPL Commands:");
    println!("  \\e <entity>     Query another entity type");
    println!("  \\dt             Show entity types");
    println!("  \\user [name]    Set or clear the current user");
    println!("  \\now [time]     Set the clock (yyyy-MM-dd HH:mm) or reset it");
    println!("  \\p <query>      Show the prepared query");
    println!("  verbose         Toggle verbose mode");
    println!("  help, \\h        Show this help");
    println!("  quit, \\q        Exit");
    println!();
    println!("Anything else is an EQL query, for example:");
    println!("  name like 'A%' and group.name = 'Sales' order by created desc");
    println!("  representatives contains ('john', 'joe')");
    println!("  status in (BROKE, null)");
}
