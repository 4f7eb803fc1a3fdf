//! Stable textual rendering of a type model.

use std::fmt::Write;

use super::declaration::{Properties, TypeDeclaration};
use super::model::TypeModel;
use super::namespace::TypeNamespace;

impl TypeModel {
    /// Render model-owned namespaces in registration order. Named
    /// declarations come first in creation order, then anonymous ones.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for ns in self.namespaces() {
            self.format_namespace(w, ns)?;
        }
        Ok(())
    }

    fn format_namespace(&self, w: &mut impl Write, ns: &TypeNamespace) -> std::fmt::Result {
        writeln!(w, "namespace {} {{", ns.qualified_name())?;
        for import in ns.imports() {
            writeln!(w, "  import {import}")?;
        }
        for decl in ns.owned_declarations() {
            self.format_declaration(w, decl)?;
        }
        for decl in ns.anonymous_declarations() {
            self.format_declaration(w, decl)?;
        }
        writeln!(w, "}}")
    }

    fn format_declaration(&self, w: &mut impl Write, decl: &TypeDeclaration) -> std::fmt::Result {
        match decl {
            TypeDeclaration::Special(t) => writeln!(w, "  special {}", t.name),
            TypeDeclaration::Primitive(t) => writeln!(w, "  primitive {}", t.name),
            TypeDeclaration::Enum(t) => {
                writeln!(w, "  enum {} {{ {} }}", t.name, t.literals.join(", "))
            }
            TypeDeclaration::Collection(t) => {
                writeln!(w, "  collection {}<{}>", t.name, t.type_parameters.join(", "))
            }
            TypeDeclaration::Data(t) => {
                write!(w, "  {} {}", decl.kind_label(), t.name)?;
                if !t.supertypes.is_empty() {
                    let supers: Vec<_> = t.supertypes.iter().map(|s| self.signature(s)).collect();
                    write!(w, " : {}", supers.join(", "))?;
                }
                self.format_properties(w, &t.properties)
            }
            TypeDeclaration::Tuple(t) => {
                write!(w, "  tuple #{}", t.id.index())?;
                self.format_properties(w, &t.properties)
            }
            TypeDeclaration::UnnamedSupertype(t) => {
                let members: Vec<_> = t.subtypes.iter().map(|s| self.signature(s)).collect();
                match &t.name {
                    Some(name) => writeln!(w, "  union {name} = ({})", members.join(" | ")),
                    None => writeln!(w, "  unnamed #{} = ({})", t.id.index(), members.join(" | ")),
                }
            }
        }
    }

    fn format_properties(&self, w: &mut impl Write, properties: &Properties) -> std::fmt::Result {
        if properties.is_empty() {
            return writeln!(w, " {{}}");
        }
        writeln!(w, " {{")?;
        for p in properties.values() {
            write!(w, "    {}: {} [{}]", p.name, self.signature(&p.type_instance), p.index)?;
            if p.characteristics.is_reference() {
                write!(w, " ref")?;
            }
            writeln!(w)?;
        }
        writeln!(w, "  }}")
    }
}
