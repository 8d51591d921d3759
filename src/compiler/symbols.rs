//! Symbol table built from the quadruple stream
//!
//! Two passes over the quadruples: the first collects declared types and
//! function signatures, the second places every symbol in its scope. Types
//! missing a declaration are inferred from assignments (quoted operands are
//! char/string literals, bare digits are int) and default to int.

use rustc_hash::FxHashMap;

use crate::compiler::quad::Quadruple;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolInfo {
    name: String,
    ty: String,
    kind: String,
    scope: String,
    size: i64,
}

impl SymbolInfo {
    fn row(&self) -> String {
        if self.kind == "array" {
            format!(
                "{:<15} | {:<10} | {:<10} | {:<10} | {}",
                self.name, self.ty, self.kind, self.scope, self.size
            )
        } else {
            format!(
                "{:<15} | {:<10} | {:<10} | {:<10} |",
                self.name, self.ty, self.kind, self.scope
            )
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Symbols in declaration order.
    symbols: Vec<SymbolInfo>,
    type_table: FxHashMap<String, String>,
    /// Arrays in declaration order: (name, element type, size).
    arrays: Vec<(String, String, i64)>,
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

impl SymbolTable {
    pub fn build_from_quadruples(quadruples: &[Quadruple]) -> Self {
        let mut table = SymbolTable::default();

        // First pass: declared types and function signatures.
        for q in quadruples {
            match q.op.as_str() {
                "var_decl" | "param_decl" if q.arg1 != "_" => {
                    table.type_table.insert(q.result.clone(), q.arg1.clone());
                }
                "FuncDef" => {
                    table.type_table.insert(q.result.clone(), q.arg1.clone());
                }
                _ => {}
            }
        }

        // Second pass: place each symbol in its scope.
        let mut scope = "global".to_string();
        for q in quadruples {
            match q.op.as_str() {
                "FuncStart" => scope = q.result.clone(),
                "FuncEnd" => scope = "global".to_string(),
                "FuncDef" => {
                    table.add(&q.result, &q.arg1, "function", "global", 0);
                }
                "param_decl" => {
                    let ty = table.resolve_type(&q.arg1, &q.result, quadruples);
                    table.add(&q.result, &ty, "parameter", &scope, 0);
                }
                "var_decl" => {
                    let ty = table.resolve_type(&q.arg1, &q.result, quadruples);
                    table.add(&q.result, &ty, "variable", &scope, 0);
                }
                "ARRAY_DECL" => {
                    let size: i64 = q.arg2.parse().unwrap_or(0);
                    let ty = table.resolve_type("_", &q.arg1, quadruples);
                    table.add_array(&q.arg1, &ty, size, &scope);
                }
                _ => {}
            }
        }

        table
    }

    fn resolve_type(&self, declared: &str, name: &str, quadruples: &[Quadruple]) -> String {
        if declared != "_" {
            return declared.to_string();
        }
        if let Some(ty) = self.type_table.get(name) {
            return ty.clone();
        }
        // Infer from the first assignment into the symbol.
        for q in quadruples {
            if q.op == "=" && q.result == name {
                if let Some(ty) = self.type_table.get(&q.arg1) {
                    return ty.clone();
                }
                if q.arg1.starts_with('\'') && q.arg1.ends_with('\'') {
                    return "char".to_string();
                }
                if q.arg1.starts_with('"') && q.arg1.ends_with('"') {
                    return "string".to_string();
                }
                if is_number(&q.arg1) {
                    return "int".to_string();
                }
            }
        }
        "int".to_string()
    }

    fn add(&mut self, name: &str, ty: &str, kind: &str, scope: &str, size: i64) {
        if name.is_empty() || name == "_" {
            return;
        }
        let info = SymbolInfo {
            name: name.to_string(),
            ty: ty.to_string(),
            kind: kind.to_string(),
            scope: scope.to_string(),
            size,
        };
        if let Some(existing) = self.symbols.iter_mut().find(|s| s.name == name) {
            *existing = info;
        } else {
            self.symbols.push(info);
        }
        self.type_table.insert(name.to_string(), ty.to_string());
    }

    fn add_array(&mut self, name: &str, ty: &str, size: i64, scope: &str) {
        self.add(name, ty, "array", scope, size);
        if let Some(existing) = self.arrays.iter_mut().find(|(n, _, _)| n == name) {
            existing.1 = ty.to_string();
            existing.2 = size;
        } else {
            self.arrays.push((name.to_string(), ty.to_string(), size));
        }
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.symbols
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.ty.as_str())
    }

    pub fn scope_of(&self, name: &str) -> Option<&str> {
        self.symbols
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.scope.as_str())
    }

    pub fn is_array(&self, name: &str) -> bool {
        self.arrays.iter().any(|(n, _, _)| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Render the table as display lines: global symbols first, then each
    /// function scope, then the array table.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "{:<15} | {:<10} | {:<10} | {:<10} | {}",
            "name", "type", "kind", "scope", "size"
        ));
        lines.push("-".repeat(68));

        let globals: Vec<&SymbolInfo> =
            self.symbols.iter().filter(|s| s.scope == "global").collect();
        if !globals.is_empty() {
            lines.push("Global symbols:".to_string());
            for info in globals {
                lines.push(info.row());
            }
        }

        let mut seen_scopes: Vec<&str> = Vec::new();
        for info in &self.symbols {
            if info.scope != "global" && !seen_scopes.contains(&info.scope.as_str()) {
                seen_scopes.push(&info.scope);
            }
        }
        for scope in seen_scopes {
            lines.push(format!("Symbols of function '{}':", scope));
            for info in self.symbols.iter().filter(|s| s.scope == scope) {
                lines.push(info.row());
            }
        }

        if !self.arrays.is_empty() {
            lines.push("Array table:".to_string());
            lines.push(format!("{:<15} | {:<10} | {}", "array", "elem type", "size"));
            for (name, ty, size) in &self.arrays {
                lines.push(format!("{:<15} | {:<10} | {}", name, ty, size));
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(op: &str, a1: &str, a2: &str, r: &str) -> Quadruple {
        Quadruple::new(op, a1, a2, r)
    }

    #[test]
    fn test_declared_variable() {
        let table = SymbolTable::build_from_quadruples(&[q("var_decl", "int", "_", "x")]);
        assert_eq!(table.type_of("x"), Some("int"));
        assert_eq!(table.scope_of("x"), Some("global"));
    }

    #[test]
    fn test_scopes_follow_function_brackets() {
        let table = SymbolTable::build_from_quadruples(&[
            q("FuncStart", "_", "_", "add"),
            q("FuncDef", "int", "2", "add"),
            q("param_decl", "int", "_", "a"),
            q("var_decl", "char", "_", "c"),
            q("FuncEnd", "_", "_", "add"),
            q("var_decl", "int", "_", "g"),
        ]);
        assert_eq!(table.scope_of("a"), Some("add"));
        assert_eq!(table.scope_of("c"), Some("add"));
        assert_eq!(table.scope_of("g"), Some("global"));
        assert_eq!(table.type_of("add"), Some("int"));
    }

    #[test]
    fn test_array_recorded_with_size() {
        let table = SymbolTable::build_from_quadruples(&[
            q("var_decl", "int", "_", "arr"),
            q("ARRAY_DECL", "arr", "10", "_"),
        ]);
        assert!(table.is_array("arr"));
        assert_eq!(table.type_of("arr"), Some("int"));
        let rendered = table.render().join("\n");
        assert!(rendered.contains("Array table:"));
        assert!(rendered.contains("10"));
    }

    #[test]
    fn test_type_inferred_from_assignment() {
        let table = SymbolTable::build_from_quadruples(&[
            q("var_decl", "_", "_", "c"),
            q("=", "'x'", "_", "c"),
            q("var_decl", "_", "_", "n"),
            q("=", "42", "_", "n"),
        ]);
        assert_eq!(table.type_of("c"), Some("char"));
        assert_eq!(table.type_of("n"), Some("int"));
    }

    #[test]
    fn test_render_groups_scopes() {
        let table = SymbolTable::build_from_quadruples(&[
            q("var_decl", "int", "_", "g"),
            q("FuncStart", "_", "_", "f"),
            q("FuncDef", "int", "0", "f"),
            q("var_decl", "int", "_", "local"),
            q("FuncEnd", "_", "_", "f"),
        ]);
        let lines = table.render();
        let global_idx = lines.iter().position(|l| l == "Global symbols:").unwrap();
        let func_idx = lines
            .iter()
            .position(|l| l == "Symbols of function 'f':")
            .unwrap();
        assert!(global_idx < func_idx);
    }
}
