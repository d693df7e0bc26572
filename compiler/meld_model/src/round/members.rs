//! Enclosed-set computation for composite nodes.

use std::rc::Rc;

use meld_host::HostKind;

use super::build::MemberContext;
use super::Round;
use crate::element::{ClassElement, Element, Enclosed};
use crate::matching;
use crate::origin::SourceView;
use crate::ModelError;

impl Round<'_> {
    /// Type parameters, nested classes, constructors, functions and
    /// properties of a class, in that order.
    pub(super) fn class_members(
        &self,
        node: &Element,
        class: &ClassElement,
    ) -> Result<Enclosed, ModelError> {
        let mut enclosed = Enclosed::default();
        let Some(id) = node.host() else {
            return Ok(enclosed);
        };
        let unit = class.unit();
        let plan = matching::plan_members(self.host, id, unit, &self.config)
            .map_err(|source| ModelError::NameTable { unit: id, source })?;
        let cx = MemberContext {
            class: id,
            unit,
            view: match unit {
                Some(_) => SourceView::Descriptor {
                    synthetic_owner: class.is_synthetic(),
                },
                None => SourceView::Host,
            },
        };

        for tp in &class.type_parameters {
            enclosed.push(Rc::clone(tp), tp.host());
        }
        for &nested in &plan.nested {
            if let Some(child) = self.isolate(nested, self.element(nested))? {
                enclosed.push(child, [nested]);
            }
        }
        for matched in &plan.constructors {
            enclosed.push(self.function_node(&cx, matched, true)?, matched.host);
        }
        for matched in &plan.functions {
            enclosed.push(self.function_node(&cx, matched, false)?, matched.host);
        }
        for matched in &plan.properties {
            let property = self.property_node(&cx, matched)?;
            for part in matched.host_parts() {
                self.alias(part, property.key());
            }
            enclosed.push(property, matched.host_parts());
        }
        for inferred in &plan.inferred {
            let property = self.inferred_property_node(inferred);
            self.alias(inferred.setter, property.key());
            enclosed.push(property, [inferred.getter, inferred.setter]);
        }

        tracing::debug!(
            class = %id,
            members = enclosed.elements.len(),
            dropped = plan.dropped.len(),
            "resolved class members"
        );
        Ok(enclosed)
    }

    /// Classes of a package. Classes whose unit fails are recorded and
    /// left out.
    pub(super) fn package_members(&self, node: &Element) -> Result<Enclosed, ModelError> {
        let mut enclosed = Enclosed::default();
        let Some(id) = node.host() else {
            return Ok(enclosed);
        };
        for &member in self.host.enclosed(id) {
            if !self.host.kind(member).is_class_like() {
                continue;
            }
            if let Some(class) = self.isolate(member, self.element(member))? {
                enclosed.push(class, [member]);
            }
        }
        Ok(enclosed)
    }

    pub(super) fn module_members(&self, node: &Element) -> Result<Enclosed, ModelError> {
        let mut enclosed = Enclosed::default();
        let Some(id) = node.host() else {
            return Ok(enclosed);
        };
        for &member in self.host.enclosed(id) {
            if self.host.kind(member) == HostKind::Package {
                enclosed.push(self.element(member)?, [member]);
            }
        }
        Ok(enclosed)
    }
}
