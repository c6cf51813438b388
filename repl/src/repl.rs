//! Core REPL state and execution.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use eql_core::parse_date_time;
use eql_prepare::{Preparer, QueryContext};
use eql_query::{EntityBinding, InMemoryRepository};
use eql_registry::Registry;

use crate::format::{format_record, format_type, print_help};
use crate::{Dataset, Record, ReplError, ReplResult};

/// REPL state.
pub struct Repl {
    registry: Arc<Registry>,
    bindings: BTreeMap<String, EntityBinding<Record>>,
    entity: String,
    context: QueryContext,
    verbose: bool,
}

impl Repl {
    /// Create a REPL over a loaded dataset. Queries target `entity`, or the
    /// first entity type by name.
    pub fn new(dataset: &Dataset, entity: Option<&str>) -> ReplResult<Self> {
        let registry = dataset.registry();
        let preparer = Preparer::new(Arc::clone(&registry));
        let mut bindings = BTreeMap::new();
        for def in registry.entities() {
            let repository = Arc::new(InMemoryRepository::new(dataset.records(&def.name)));
            let binding = EntityBinding::bind(def.name.as_str(), preparer.clone(), repository)?;
            bindings.insert(def.name.clone(), binding);
        }

        let entity = match entity {
            Some(name) => name.to_string(),
            None => bindings
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| ReplError::Usage("The dataset declares no entity types".into()))?,
        };
        let mut repl = Self {
            registry,
            bindings,
            entity: String::new(),
            context: QueryContext::at_local_time(),
            verbose: false,
        };
        repl.switch_entity(&entity)?;
        Ok(repl)
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Toggle verbose mode.
    pub fn toggle_verbose(&mut self) {
        self.verbose = !self.verbose;
        println!("Verbose mode: {}", self.verbose);
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn set_context(&mut self, context: QueryContext) {
        self.context = context;
    }

    /// Make `entity` the target of subsequent queries.
    pub fn switch_entity(&mut self, entity: &str) -> ReplResult<()> {
        if !self.bindings.contains_key(entity) {
            return Err(ReplError::Usage(format!("Unknown entity type: {}", entity)));
        }
        self.entity = entity.to_string();
        Ok(())
    }

    fn binding(&self) -> ReplResult<&EntityBinding<Record>> {
        self.bindings
            .get(&self.entity)
            .ok_or_else(|| ReplError::Usage(format!("Unknown entity type: {}", self.entity)))
    }

    /// Print the declared entity types.
    pub fn print_types(&self) {
        for name in self.bindings.keys() {
            let Some(def) = self.registry.entity(name) else {
                continue;
            };
            println!("{}", def.name);
            for property in def.properties() {
                let marker = if property.name == def.id_property { " (id)" } else { "" };
                println!("  {}: {}{}", property.name, format_type(&property.property_type), marker);
            }
        }
    }

    /// Execute a command or an EQL query.
    pub fn execute(&mut self, input: &str) -> ReplResult<String> {
        let trimmed = input.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with("--") {
            return Ok(String::new());
        }

        let (command, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };
        match command {
            "\\e" => {
                if argument.is_empty() {
                    return Ok(format!("Querying {}", self.entity));
                }
                self.switch_entity(argument)?;
                Ok(format!("Querying {}", self.entity))
            }
            "\\user" => {
                self.context.principal = (!argument.is_empty()).then(|| argument.to_string());
                Ok(format!("Current user: {}", self.context.principal.as_deref().unwrap_or("(none)")))
            }
            "\\now" => {
                self.context.now = if argument.is_empty() {
                    QueryContext::at_local_time().now
                } else {
                    parse_date_time(argument)
                        .ok_or_else(|| ReplError::Usage(format!("Invalid date-time: {}", argument)))?
                };
                Ok(format!("Now: {}", self.context.now))
            }
            "\\p" => {
                let prepared = self.binding()?.parse(argument, &self.context)?;
                Ok(prepared.to_string())
            }
            _ => self.run_query(trimmed),
        }
    }

    /// Run an EQL query against the current entity type.
    pub fn run_query(&self, text: &str) -> ReplResult<String> {
        let binding = self.binding()?;
        let prepared = binding.parse(text, &self.context)?;
        if self.verbose {
            println!("-- {}", prepared);
        }
        let records = binding.find_all(&prepared)?;

        let Some(def) = self.registry.entity(&self.entity) else {
            return Err(ReplError::Usage(format!("Unknown entity type: {}", self.entity)));
        };
        let mut output: Vec<String> = records.iter().map(|r| format_record(def, r)).collect();
        output.push(format!(
            "({} {})",
            records.len(),
            if records.len() == 1 { "row" } else { "rows" }
        ));
        Ok(output.join("\n"))
    }

    /// Run a script: one command or query per line.
    pub fn run_script(&mut self, content: &str) -> ReplResult<()> {
        for line in content.lines() {
            match self.execute(line) {
                Ok(output) => {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Ok(())
    }

    /// Run the interactive REPL.
    pub fn interactive(&mut self) {
        println!("EQL REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type 'help' for commands, 'quit' to exit");
        println!();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("eql:{}> ", self.entity);
            if stdout.flush().is_err() {
                break;
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    break;
                }
            }

            match line.trim().to_lowercase().as_str() {
                "quit" | "exit" | "\\q" => break,
                "help" | "\\h" => {
                    print_help();
                    continue;
                }
                "types" | "\\dt" => {
                    self.print_types();
                    continue;
                }
                "verbose" => {
                    self.toggle_verbose();
                    continue;
                }
                _ => {}
            }

            match self.execute(&line) {
                Ok(output) => {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }
}
