//! Textual rendering of an ASM.

use std::fmt::Write;

use super::model::{Asm, AsmReference, AsmValue, ReferenceTarget};

impl Asm {
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for root in self.roots() {
            self.format_value(w, root, 0)?;
            writeln!(w)?;
        }
        Ok(())
    }

    fn format_value(&self, w: &mut impl Write, value: &AsmValue, indent: usize) -> std::fmt::Result {
        let pad = "  ".repeat(indent);
        match value {
            AsmValue::Nothing => write!(w, "nothing"),
            AsmValue::Primitive(text) => write!(w, "'{text}'"),
            AsmValue::Reference(reference) => self.format_reference(w, reference),
            AsmValue::List(items) => {
                if items.is_empty() {
                    return write!(w, "[]");
                }
                writeln!(w, "[")?;
                for item in items {
                    write!(w, "{pad}  ")?;
                    self.format_value(w, item, indent + 1)?;
                    writeln!(w)?;
                }
                write!(w, "{pad}]")
            }
            AsmValue::Structure(id) => {
                let structure = self.structure(*id);
                if structure.properties.is_empty() {
                    return write!(w, "{} {{}}", structure.simple_type_name());
                }
                writeln!(w, "{} {{", structure.simple_type_name())?;
                for (name, value) in &structure.properties {
                    write!(w, "{pad}  {name}: ")?;
                    self.format_value(w, value, indent + 1)?;
                    writeln!(w)?;
                }
                write!(w, "{pad}}}")
            }
        }
    }

    fn format_reference(&self, w: &mut impl Write, reference: &AsmReference) -> std::fmt::Result {
        match reference.target {
            ReferenceTarget::Unresolved => write!(w, "&{} -> ?", reference.reference),
            ReferenceTarget::External => write!(w, "&{} -> external", reference.reference),
            ReferenceTarget::Element(id) => {
                write!(w, "&{} -> {}", reference.reference, self.structure(id).path)
            }
        }
    }
}
