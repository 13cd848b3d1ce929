use crate::framework::{ParameterType, Reflector};
use tracing::trace;

/// Base class every validation request derives from.
pub const DEFAULT_FORM_REQUEST_BASE: &str = "Illuminate\\Foundation\\Http\\FormRequest";

/// Finds the validation request class injected into a handler method.
#[derive(Debug, Clone)]
pub struct FormRequestResolver {
    base_class: String,
}

impl FormRequestResolver {
    pub fn new(base_class: &str) -> Self {
        FormRequestResolver {
            base_class: base_class.to_string(),
        }
    }

    /// First parameter type that exists and strictly derives from the base
    /// class. Union members are checked left to right.
    pub fn resolve(&self, reflector: &dyn Reflector, class: &str, method: &str) -> Option<String> {
        if !reflector.class_exists(class) || !reflector.method_exists(class, method) {
            return None;
        }
        reflector
            .parameter_types(class, method)
            .iter()
            .find_map(|ty| self.candidate(reflector, ty))
    }

    fn candidate(&self, reflector: &dyn Reflector, ty: &ParameterType) -> Option<String> {
        match ty {
            ParameterType::Builtin(_) => None,
            ParameterType::Class(name) => {
                let found = reflector.class_exists(name)
                    && reflector.is_subclass_of(name, &self.base_class);
                trace!(class = %name, found, "checked handler parameter");
                found.then(|| name.clone())
            }
            ParameterType::Union(members) => {
                members.iter().find_map(|m| self.candidate(reflector, m))
            }
        }
    }
}

impl Default for FormRequestResolver {
    fn default() -> Self {
        FormRequestResolver::new(DEFAULT_FORM_REQUEST_BASE)
    }
}
