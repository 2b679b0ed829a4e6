use std::collections::HashMap;

/// Where a resolved symbol lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    /// A top-level binding, addressed into the globals array.
    Global,
    /// A binding inside a function, addressed relative to the frame's base
    /// pointer.
    Local,
    /// A captured outer binding, addressed into the running closure's free
    /// list.
    Free,
    /// A registry builtin.
    Builtin,
    /// The enclosing function's own name; loads the closure executing in the
    /// current frame.
    Function,
}

/// A resolved name: where it lives and at which index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The name as written in the source.
    pub name:  String,
    /// The symbol's storage class.
    pub scope: SymbolScope,
    /// The dense index within that storage class.
    pub index: usize,
}

/// One scope of the compiler's name resolution chain.
///
/// Global and local indices are dense, zero-based, and assigned in
/// definition order per scope. Resolution searches outward; a local or free
/// symbol found in an enclosing function scope is promoted to a free symbol
/// here, and the original is recorded in [`SymbolTable::free_symbols`] in
/// promotion order so the compiler can emit matching capture loads.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// The enclosing scope, if any.
    pub outer:           Option<Box<SymbolTable>>,
    /// Originals of the symbols promoted to free in this scope, in index
    /// order.
    pub free_symbols:    Vec<Symbol>,
    /// How many names have been defined directly in this scope.
    pub num_definitions: usize,
    store:               HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates an empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope enclosed by `outer`.
    #[must_use]
    pub fn new_enclosed(outer: Self) -> Self {
        Self { outer: Some(Box::new(outer)),
               ..Self::default() }
    }

    /// Defines a name in this scope and returns its symbol.
    ///
    /// The scope kind is `Global` at the top level and `Local` anywhere
    /// else; either way the index is the next dense slot. Redefining a name
    /// shadows the previous symbol under a fresh index.
    ///
    /// # Example
    /// ```
    /// use tensora::compiler::symbol_table::{SymbolScope, SymbolTable};
    ///
    /// let mut global = SymbolTable::new();
    /// let a = global.define("a");
    /// assert_eq!((a.scope, a.index), (SymbolScope::Global, 0));
    ///
    /// let mut local = SymbolTable::new_enclosed(global);
    /// let b = local.define("b");
    /// assert_eq!((b.scope, b.index), (SymbolScope::Local, 0));
    /// ```
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.outer.is_none() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };

        let symbol = Symbol { name: name.to_string(),
                              scope,
                              index: self.num_definitions };
        self.store.insert(name.to_string(), symbol.clone());
        self.num_definitions += 1;

        symbol
    }

    /// Installs a builtin under a caller-assigned dense index.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol { name: name.to_string(),
                              scope: SymbolScope::Builtin,
                              index };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Pre-installs the enclosing function's own name before its body is
    /// compiled, so the body can refer to the function without capturing it.
    /// A later [`define`](Self::define) of the same name shadows this symbol.
    pub fn define_function_name(&mut self, name: &str) -> Symbol {
        let symbol = Symbol { name:  name.to_string(),
                              scope: SymbolScope::Function,
                              index: 0, };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Resolves a name, searching this scope and then the enclosing chain.
    ///
    /// Global and builtin symbols are returned unchanged wherever they were
    /// found. Anything else found in an enclosing scope must be captured at
    /// closure construction, so it is recorded as free here and returned
    /// under the `Free` scope.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }

        let outer = self.outer.as_mut()?;
        let symbol = outer.resolve(name)?;

        match symbol.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(symbol),
            _ => Some(self.define_free(symbol)),
        }
    }

    /// Records an outer symbol as captured and returns its free-scope alias.
    /// The free index is the position of the original in
    /// [`SymbolTable::free_symbols`].
    fn define_free(&mut self, original: Symbol) -> Symbol {
        let symbol = Symbol { name:  original.name.clone(),
                              scope: SymbolScope::Free,
                              index: self.free_symbols.len(), };
        self.free_symbols.push(original);
        self.store.insert(symbol.name.clone(), symbol.clone());

        symbol
    }
}
