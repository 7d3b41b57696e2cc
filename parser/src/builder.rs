use log::{debug, info, warn};

use crate::ast::{Field, Function, Ir, Table};
use crate::classify::{place, Placement};
use crate::decl::Declaration;
use crate::error::{Error, Result};

/// Append-only accumulator for the IR tables; [`IrBuilder::seal`] hands out the read-only [`Ir`].
#[derive(Debug, Default)]
pub struct IrBuilder {
    enums: Table<Vec<String>>,
    bitmasks: Table<Vec<String>>,
    classes: Table<Table<Function>>,
    functions: Table<Function>,
    structs: Table<Vec<Field>>,
}

impl IrBuilder {
    pub fn new() -> IrBuilder {
        IrBuilder::default()
    }

    pub fn apply(&mut self, line: usize, declaration: Declaration) -> Result<()> {
        match declaration {
            Declaration::Enum { name, members } => {
                debug!("line {}: enum {} ({} members)", line, name, members.len());
                self.enums.insert(name, members);
            }
            Declaration::Bitmask { group, flag } => {
                debug!("line {}: bitmask {}::{}", line, group, flag);
                self.bitmasks.entry(group).or_default().push(flag);
            }
            Declaration::Struct { name, fields } => {
                debug!("line {}: struct {} ({} fields)", line, name, fields.len());
                self.structs.insert(name, fields);
            }
            Declaration::Function {
                name,
                params,
                return_type,
            } => match place(name, params, return_type) {
                Placement::Method {
                    class,
                    key,
                    function,
                } => {
                    debug!("line {}: method {}::{}", line, class, key);
                    self.classes.entry(class).or_default().insert(key, function);
                }
                Placement::Free { name, function } => {
                    debug!("line {}: function {}", line, name);
                    self.functions.insert(name, function);
                }
            },
            Declaration::StructInit { name, defaults } => {
                let fields = match self.structs.get_mut(&name) {
                    Some(fields) => fields,
                    None => return Err(Error::UnknownCrossReference { line, name }),
                };

                debug!("line {}: defaults for {} ({} fields)", line, name, defaults.len());
                for (field_name, value) in defaults {
                    match fields.iter_mut().find(|f| *f.name() == field_name) {
                        Some(field) => {
                            field.set_default(Some(value));
                        }
                        None => warn!(
                            "line {}: initializer sets unknown field {}.{}, ignored",
                            line, name, field_name
                        ),
                    }
                }
            }
        }
        Ok(())
    }

    pub fn seal(self) -> Ir {
        info!(
            "parsed {} enums, {} bitmasks, {} classes, {} functions, {} structs",
            self.enums.len(),
            self.bitmasks.len(),
            self.classes.len(),
            self.functions.len(),
            self.structs.len()
        );
        Ir::new(
            self.enums,
            self.bitmasks,
            self.classes,
            self.functions,
            self.structs,
        )
    }
}
