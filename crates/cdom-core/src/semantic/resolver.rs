//! Binding resolution
//!
//! Scopes are populated on first touch: the first lookup in a scope resolves every name the
//! scope declares, in source order. Declaring a name that is already bound in the same scope
//! reconciles with the existing binding instead of creating a new one, so resolution is
//! idempotent and independent of the order names are queried in.

use tracing::{debug, trace};

use super::SemanticModel;
use super::bindings::{BindingId, BindingKind, FunctionInfo};
use super::overload::same_signature;
use super::roles::{
    NameRole, NameUse, call_of, classify, declares_function, enclosing_function,
    enclosing_scope_node, member_of, opens_scope, scope_kind_of, scope_opened_for,
};
use super::scope::{NamespaceKind, Population, ScopeId, ScopeKind};
use crate::ast::{Ast, Language, NodeId, NodeKind, StorageClass, TagKind};
use crate::context::TranslationUnitContext;
use crate::problems::ProblemKind;
use crate::types::Type;

/// What a declaring name asks the scope for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Declared {
    Variable { external: bool, initialized: bool },
    Parameter,
    Function { definition: bool, info: FunctionInfo },
    Field { owner: BindingId },
    Typedef,
    Tag { tag: TagKind, definition: bool },
    Enumerator { enumeration: Option<BindingId> },
    Label,
    Namespace,
}

impl Declared {
    fn namespace(self) -> NamespaceKind {
        match self {
            Declared::Tag { .. } => NamespaceKind::Tag,
            Declared::Label => NamespaceKind::Label,
            _ => NamespaceKind::Ordinary,
        }
    }

    fn binding_kind(self) -> BindingKind {
        match self {
            Declared::Variable { .. } => BindingKind::Variable,
            Declared::Parameter => BindingKind::Parameter,
            Declared::Function { info, .. } => BindingKind::Function(info),
            Declared::Field { owner } => BindingKind::Field { owner },
            Declared::Typedef => BindingKind::Typedef,
            Declared::Tag {
                tag: TagKind::Enum, ..
            } => BindingKind::Enumeration,
            Declared::Tag { tag, .. } => match tag.composite_kind() {
                Some(kind) => BindingKind::Composite(kind),
                None => BindingKind::Enumeration,
            },
            Declared::Enumerator { enumeration } => BindingKind::Enumerator { enumeration },
            Declared::Label => BindingKind::Label,
            Declared::Namespace => BindingKind::Namespace,
        }
    }

    fn is_definition(self) -> bool {
        match self {
            Declared::Variable {
                external,
                initialized,
            } => initialized || !external,
            Declared::Function { definition, .. } | Declared::Tag { definition, .. } => definition,
            Declared::Parameter
            | Declared::Field { .. }
            | Declared::Typedef
            | Declared::Enumerator { .. }
            | Declared::Label
            | Declared::Namespace => true,
        }
    }
}

enum Reconciled {
    Reuse(BindingId),
    New,
    Problem(ProblemKind),
}

/// Resolution pass over one translation unit.
pub(crate) struct Resolver<'a> {
    pub(crate) ast: &'a Ast,
    pub(crate) context: &'a TranslationUnitContext,
    pub(crate) model: &'a mut SemanticModel,
    language: Language,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        ast: &'a Ast,
        context: &'a TranslationUnitContext,
        model: &'a mut SemanticModel,
    ) -> Self {
        let language = context.language.unwrap_or(ast.language());
        Self {
            ast,
            context,
            model,
            language,
        }
    }

    pub(crate) fn is_cpp(&self) -> bool {
        self.language.is_cpp()
    }

    pub(crate) fn text(&self, name: NodeId) -> String {
        self.ast.name_text(name).unwrap_or_default().to_string()
    }

    pub(crate) fn kind_of(&self, binding: BindingId) -> BindingKind {
        self.model.bindings.get(binding).kind
    }

    pub(crate) fn problem(&mut self, kind: ProblemKind, name: NodeId) -> BindingId {
        let text = self.ast.raw_text(name);
        debug!(problem = %kind, name = %text, node = name.index(), "binding problem");
        self.model.bindings.problem(kind, name, &text)
    }

    /// Scope opened by `node`, created on first use together with its ancestors.
    pub(crate) fn scope_for(&mut self, node: NodeId) -> ScopeId {
        if let Some(id) = self.model.scopes.scope_for_node(node) {
            return id;
        }
        let parent = if node == self.ast.root() {
            None
        } else {
            let outer = enclosing_scope_node(self.ast, node);
            Some(self.scope_for(outer))
        };
        let kind = scope_kind_of(self.ast, node);
        trace!(?kind, node = node.index(), "creating scope");
        self.model.scopes.create_scope(kind, parent, node)
    }

    pub(crate) fn resolve_all(&mut self) {
        for &id in self.ast.preorder() {
            if self.ast.is_name(id) {
                self.resolve(id);
            }
        }
    }

    pub(crate) fn resolve(&mut self, name: NodeId) -> BindingId {
        if let Some(binding) = self.model.cached(name) {
            return binding;
        }

        let name_use = classify(self.ast, name);
        let role = name_use.role();
        if role == NameRole::Declaration {
            let scope_node = self.declaring_scope_node(name, name_use);
            let scope = self.scope_for(scope_node);
            self.ensure_populated(scope);
            if let Some(binding) = self.model.cached(name) {
                return binding;
            }
        }

        if !self.model.resolving.insert(name) {
            return self.problem(ProblemKind::RecursionInLookup, name);
        }
        let binding = match role {
            NameRole::Declaration => self.declare_name(name, name_use),
            NameRole::Reference | NameRole::Neither => self.resolve_reference(name, name_use),
        };
        self.model.resolving.remove(&name);
        self.model.names.insert(name, binding);
        binding
    }

    /// Resolves, in source order, every name that declares into `scope`.
    pub(crate) fn ensure_populated(&mut self, scope: ScopeId) {
        if self.model.scopes.get(scope).population != Population::NotStarted {
            return;
        }
        self.model.scopes.get_mut(scope).population = Population::InProgress;

        let node = self.model.scopes.get(scope).node;
        let (names, usings) = self.collect_declarations(node);
        trace!(
            scope = node.index(),
            declarations = names.len(),
            usings = usings.len(),
            "populating scope"
        );
        self.model.scopes.get_mut(scope).usings = usings;
        for name in names {
            self.resolve(name);
        }

        self.model.scopes.get_mut(scope).population = Population::Done;
    }

    fn collect_declarations(&self, scope_node: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let ast = self.ast;
        let target = scope_kind_of(ast, scope_node);
        let mut names = Vec::new();
        let mut usings = Vec::new();

        let mut stack = vec![scope_node];
        while let Some(node) = stack.pop() {
            if ast.is_name(node) {
                let name_use = classify(ast, node);
                if name_use == NameUse::Using {
                    if enclosing_scope_node(ast, node) == scope_node {
                        usings.push(node);
                    }
                } else if name_use.role() == NameRole::Declaration
                    && self.declaring_scope_node(node, name_use) == scope_node
                {
                    names.push(node);
                }
                continue;
            }

            let nested = opens_scope(ast, node);
            for child in ast.children(node).into_iter().rev() {
                if nested && node != scope_node {
                    if let Some(opened) = scope_opened_for(ast, node, child) {
                        if opened != scope_node && !self.may_declare_outward(opened, target) {
                            continue;
                        }
                    }
                }
                stack.push(child);
            }
        }
        (names, usings)
    }

    /// Whether names inside the scope opened by `inner` can declare into a scope of kind
    /// `target`: C tags escape class scopes and labels escape blocks.
    fn may_declare_outward(&self, inner: NodeId, target: ScopeKind) -> bool {
        match scope_kind_of(self.ast, inner) {
            ScopeKind::Class => true,
            ScopeKind::Block => target == ScopeKind::Function,
            _ => false,
        }
    }

    pub(crate) fn declaring_scope_node(&self, name: NodeId, name_use: NameUse) -> NodeId {
        let ast = self.ast;
        match name_use {
            NameUse::Label => {
                enclosing_function(ast, name).unwrap_or_else(|| enclosing_scope_node(ast, name))
            }
            NameUse::TagDefinition { specifier, .. }
            | NameUse::TagDeclaration { specifier, .. }
            | NameUse::Enumerator { specifier } => {
                self.tag_scope_node(enclosing_scope_node(ast, specifier))
            }
            _ => enclosing_scope_node(ast, name),
        }
    }

    /// C declares tags and enumerators found inside a struct in the enclosing scope.
    fn tag_scope_node(&self, mut node: NodeId) -> NodeId {
        if !self.is_cpp() {
            while node != self.ast.root() && scope_kind_of(self.ast, node) == ScopeKind::Class {
                node = enclosing_scope_node(self.ast, node);
            }
        }
        node
    }

    fn declare_name(&mut self, name: NodeId, name_use: NameUse) -> BindingId {
        let request = match name_use {
            NameUse::Declarator { declarator, owner } => {
                self.declarator_request(name, declarator, owner)
            }
            NameUse::TagDefinition { tag, .. } => Declared::Tag {
                tag,
                definition: true,
            },
            NameUse::TagDeclaration { tag, .. } => Declared::Tag {
                tag,
                definition: false,
            },
            NameUse::Enumerator { specifier } => {
                let enumeration = match self.ast.kind(specifier) {
                    NodeKind::EnumerationSpecifier { name: enum_name, .. } => {
                        let enum_name = *enum_name;
                        Some(self.resolve(enum_name))
                    }
                    _ => None,
                };
                Declared::Enumerator { enumeration }
            }
            NameUse::Label => Declared::Label,
            NameUse::Namespace => Declared::Namespace,
            _ => return self.problem(ProblemKind::NameNotFound, name),
        };

        let scope_node = self.declaring_scope_node(name, name_use);
        let scope = self.scope_for(scope_node);
        let text = self.text(name);
        self.declare(scope, &text, name, request)
    }

    fn declarator_request(&mut self, name: NodeId, declarator: NodeId, owner: NodeId) -> Declared {
        let name_declarator = self.ast.parent(name).unwrap_or(declarator);
        match self.ast.kind(owner) {
            NodeKind::FunctionDefinition { specifier, .. } => Declared::Function {
                definition: true,
                info: self.member_function_info(name, owner, *specifier),
            },
            NodeKind::ParameterDeclaration { .. } => Declared::Parameter,
            NodeKind::SimpleDeclaration { specifier, .. } => {
                let specifier = *specifier;
                let common = self
                    .ast
                    .kind(specifier)
                    .specifier_common()
                    .unwrap_or_default();
                if common.storage == StorageClass::Typedef {
                    return Declared::Typedef;
                }
                if declares_function(self.ast, name_declarator) {
                    return Declared::Function {
                        definition: false,
                        info: self.member_function_info(name, owner, specifier),
                    };
                }
                if let Some(composite) = member_of(self.ast, owner) {
                    if let Some(owner) = self.composite_binding(composite) {
                        return Declared::Field { owner };
                    }
                }
                Declared::Variable {
                    external: common.storage == StorageClass::Extern,
                    initialized: self.is_initialized(name),
                }
            }
            _ => Declared::Variable {
                external: false,
                initialized: false,
            },
        }
    }

    fn member_function_info(&mut self, name: NodeId, owner: NodeId, specifier: NodeId) -> FunctionInfo {
        let explicit = self
            .ast
            .kind(specifier)
            .specifier_common()
            .is_some_and(|c| c.explicit);
        let Some(composite) = member_of(self.ast, owner) else {
            return FunctionInfo {
                explicit,
                ..FunctionInfo::default()
            };
        };
        let class = self.composite_binding(composite);
        let text = self.text(name);
        let constructor = self.is_cpp()
            && !text.is_empty()
            && class.is_some_and(|c| self.model.bindings.get(c).name == text);
        FunctionInfo {
            implicit: false,
            owner: class,
            constructor,
            explicit,
        }
    }

    /// Binding of the composite type specified by `composite`.
    pub(crate) fn composite_binding(&mut self, composite: NodeId) -> Option<BindingId> {
        match self.ast.kind(composite) {
            NodeKind::CompositeTypeSpecifier { name, .. } => {
                let name = *name;
                let binding = self.resolve(name);
                matches!(self.kind_of(binding), BindingKind::Composite(_)).then_some(binding)
            }
            _ => None,
        }
    }

    /// Whether the declarator holding `name` has an initializer.
    pub(crate) fn is_initialized(&self, name: NodeId) -> bool {
        let ast = self.ast;
        let Some(mut current) = ast.parent(name) else {
            return false;
        };
        loop {
            match ast.kind(current) {
                NodeKind::Declarator(d) => {
                    if d.initializer.is_some() {
                        return true;
                    }
                    match ast.parent(current) {
                        Some(parent) => current = parent,
                        None => return false,
                    }
                }
                _ => return false,
            }
        }
    }

    fn declare(&mut self, scope: ScopeId, text: &str, name: NodeId, request: Declared) -> BindingId {
        let namespace = request.namespace();
        let at = self.ast.order(name);

        if text.is_empty() {
            let binding = self
                .model
                .bindings
                .alloc(text, request.binding_kind(), Some(scope));
            self.record(binding, name, request);
            return binding;
        }

        let existing: Vec<BindingId> = self
            .model
            .scopes
            .get(scope)
            .entries(namespace, text)
            .iter()
            .map(|e| e.binding)
            .collect();
        if let Some(&binding) = existing
            .iter()
            .find(|&&b| self.model.bindings.get(b).declarations.contains(&name))
        {
            return binding;
        }

        let binding = match self.reconcile(scope, &existing, name, request) {
            Reconciled::Reuse(binding) => binding,
            Reconciled::New => {
                self.model
                    .bindings
                    .alloc(text, request.binding_kind(), Some(scope))
            }
            Reconciled::Problem(kind) => return self.problem(kind, name),
        };
        debug!(
            name = text,
            kind = self.kind_of(binding).label(),
            scope = ?self.model.scopes.get(scope).kind,
            "declared"
        );
        self.record(binding, name, request);
        self.model
            .scopes
            .get_mut(scope)
            .insert(namespace, text, binding, at);
        binding
    }

    fn record(&mut self, binding: BindingId, name: NodeId, request: Declared) {
        let initialized = matches!(request, Declared::Variable { initialized: true, .. });
        let entry = self.model.bindings.get_mut(binding);
        entry.add_declaration(name);
        if request.is_definition() && (entry.definition.is_none() || initialized) {
            entry.definition = Some(name);
        }
    }

    fn reconcile(
        &mut self,
        scope: ScopeId,
        existing: &[BindingId],
        name: NodeId,
        request: Declared,
    ) -> Reconciled {
        let first = existing.first().copied();
        match request {
            Declared::Tag { tag, definition } => match first {
                None => Reconciled::New,
                Some(b) if self.tag_matches(b, tag) => {
                    if definition && self.model.bindings.get(b).definition.is_some() {
                        Reconciled::Problem(ProblemKind::InvalidRedefinition)
                    } else {
                        Reconciled::Reuse(b)
                    }
                }
                Some(_) => Reconciled::Problem(ProblemKind::InvalidRedeclaration),
            },
            Declared::Function { definition, .. } => {
                if existing.iter().any(|&b| !self.kind_of(b).is_function()) {
                    return Reconciled::Problem(ProblemKind::InvalidOverload);
                }
                if existing.is_empty() {
                    return Reconciled::New;
                }
                let matching = if self.is_cpp() {
                    self.matching_overload(existing, name)
                } else {
                    first
                };
                let Some(b) = matching else {
                    return Reconciled::New;
                };
                if self.return_type_conflicts(b, name) {
                    Reconciled::Problem(ProblemKind::InvalidRedeclaration)
                } else if definition && self.model.bindings.get(b).definition.is_some() {
                    Reconciled::Problem(ProblemKind::InvalidRedefinition)
                } else {
                    Reconciled::Reuse(b)
                }
            }
            Declared::Variable {
                external,
                initialized,
            } => match first {
                None if external && self.is_block_scope(scope) => match self.linked_variable(name) {
                    Some(b) => Reconciled::Reuse(b),
                    None => Reconciled::New,
                },
                None => Reconciled::New,
                Some(b) if self.kind_of(b) == BindingKind::Variable => {
                    if !self.is_block_scope(scope) {
                        if initialized && self.binding_initialized(b) {
                            Reconciled::Problem(ProblemKind::InvalidRedefinition)
                        } else {
                            Reconciled::Reuse(b)
                        }
                    } else if external {
                        Reconciled::Reuse(b)
                    } else {
                        Reconciled::Problem(ProblemKind::InvalidRedeclaration)
                    }
                }
                Some(_) => Reconciled::Problem(ProblemKind::InvalidRedeclaration),
            },
            Declared::Typedef => self.reuse_same(first, BindingKind::Typedef),
            Declared::Namespace => self.reuse_same(first, BindingKind::Namespace),
            Declared::Label => match first {
                None => Reconciled::New,
                Some(_) => Reconciled::Problem(ProblemKind::InvalidRedefinition),
            },
            Declared::Parameter | Declared::Field { .. } | Declared::Enumerator { .. } => {
                match first {
                    None => Reconciled::New,
                    Some(_) => Reconciled::Problem(ProblemKind::InvalidRedeclaration),
                }
            }
        }
    }

    fn reuse_same(&self, first: Option<BindingId>, kind: BindingKind) -> Reconciled {
        match first {
            None => Reconciled::New,
            Some(b) if self.kind_of(b) == kind => Reconciled::Reuse(b),
            Some(_) => Reconciled::Problem(ProblemKind::InvalidRedeclaration),
        }
    }

    fn matching_overload(&mut self, existing: &[BindingId], name: NodeId) -> Option<BindingId> {
        let declared = self.declared_type(name);
        let declared = declared.as_function()?.clone();
        existing.iter().copied().find(|&b| {
            self.binding_type(b)
                .and_then(|ty| ty.as_function().map(|f| same_signature(f, &declared)))
                .unwrap_or(false)
        })
    }

    /// Whether `name` redeclares the function `existing` with another return type.
    fn return_type_conflicts(&mut self, existing: BindingId, name: NodeId) -> bool {
        let declared = self.declared_type(name);
        let Some(declared) = declared.as_function() else {
            return false;
        };
        match self.binding_type(existing) {
            Some(Type::Function(previous)) => {
                !previous.return_type.is_same_type(&declared.return_type)
            }
            _ => false,
        }
    }

    fn is_block_scope(&self, scope: ScopeId) -> bool {
        !matches!(
            self.model.scopes.get(scope).kind,
            ScopeKind::Global | ScopeKind::Namespace
        )
    }

    /// File-scope variable that a block-scope `extern` declaration of `name` refers to.
    fn linked_variable(&mut self, name: NodeId) -> Option<BindingId> {
        let global = self.scope_for(self.ast.root());
        self.ensure_populated(global);
        let text = self.text(name);
        let at = self.ast.order(name);
        self.model
            .scopes
            .get(global)
            .visible(NamespaceKind::Ordinary, &text, Some(at))
            .into_iter()
            .find(|&b| self.kind_of(b) == BindingKind::Variable)
    }

    fn binding_initialized(&self, binding: BindingId) -> bool {
        self.model
            .bindings
            .get(binding)
            .declarations
            .iter()
            .any(|&d| self.is_initialized(d))
    }

    pub(crate) fn tag_matches(&self, binding: BindingId, tag: TagKind) -> bool {
        match (self.kind_of(binding), tag) {
            (BindingKind::Enumeration, TagKind::Enum) => true,
            (BindingKind::Composite(kind), tag) => match tag.composite_kind() {
                Some(wanted) if wanted == kind => true,
                Some(wanted) => {
                    use crate::types::CompositeKind::{Class, Struct};
                    self.is_cpp() && matches!((wanted, kind), (Struct, Class) | (Class, Struct))
                }
                None => false,
            },
            _ => false,
        }
    }

    fn resolve_reference(&mut self, name: NodeId, name_use: NameUse) -> BindingId {
        let text = self.text(name);
        match name_use {
            NameUse::Identifier { expression } => match call_of(self.ast, expression) {
                Some(call) => self.resolve_call(name, &text, call),
                None => self.resolve_identifier(name, &text),
            },
            NameUse::TypeName => self.resolve_type_name(name, &text),
            NameUse::TagReference { tag, .. } => self.resolve_tag_reference(name, &text, tag),
            NameUse::Base { composite } => self.resolve_base(name, &text, composite),
            NameUse::Goto => self.resolve_label(name, &text),
            NameUse::Using => self.resolve_using(name, &text),
            NameUse::Member { reference } => self.resolve_member(name, &text, reference),
            NameUse::Designator { designator } => self.resolve_designator(name, &text, designator),
            _ => self.resolve_identifier(name, &text),
        }
    }

    /// Binds `name` to the single binding found, or to a problem.
    pub(crate) fn single(&mut self, name: NodeId, found: &[BindingId], missing: ProblemKind) -> BindingId {
        match found {
            [] => self.problem(missing, name),
            [binding] => *binding,
            _ => self.problem(ProblemKind::AmbiguousLookup, name),
        }
    }

    fn resolve_identifier(&mut self, name: NodeId, text: &str) -> BindingId {
        let found = self.lookup_ordinary(name, text);
        self.single(name, &found, ProblemKind::NameNotFound)
    }

    fn resolve_type_name(&mut self, name: NodeId, text: &str) -> BindingId {
        let found = self.lookup_ordinary(name, text);
        match found.as_slice() {
            [binding] if !self.kind_of(*binding).is_type() => {
                self.problem(ProblemKind::InvalidType, name)
            }
            _ => self.single(name, &found, ProblemKind::NameNotFound),
        }
    }

    fn resolve_tag_reference(&mut self, name: NodeId, text: &str, tag: TagKind) -> BindingId {
        let start = self.scope_for(enclosing_scope_node(self.ast, name));
        let at = self.ast.order(name);
        let found = self.lookup_tag(start, text, at);
        match found.first() {
            Some(&binding) if self.tag_matches(binding, tag) => binding,
            Some(_) => self.problem(ProblemKind::InvalidType, name),
            None => self.forward_declare(name, text, tag, start),
        }
    }

    /// An elaborated reference to an unknown tag declares it in the nearest scope that is
    /// neither a class nor a function prototype. A same-kind tag declared later in that scope
    /// is the same entity and becomes visible from here on.
    fn forward_declare(&mut self, name: NodeId, text: &str, tag: TagKind, start: ScopeId) -> BindingId {
        let mut target = start;
        loop {
            let scope = self.model.scopes.get(target);
            match (scope.kind, scope.parent) {
                (ScopeKind::Class | ScopeKind::FunctionPrototype, Some(parent)) => target = parent,
                _ => break,
            }
        }

        let at = self.ast.order(name);
        let later = self
            .model
            .scopes
            .get(target)
            .entries(NamespaceKind::Tag, text)
            .first()
            .map(|e| e.binding);
        let binding = match later {
            Some(binding) if self.tag_matches(binding, tag) => binding,
            Some(_) => return self.problem(ProblemKind::InvalidType, name),
            None => {
                let kind = Declared::Tag {
                    tag,
                    definition: false,
                }
                .binding_kind();
                self.model.bindings.alloc(text, kind, Some(target))
            }
        };
        debug!(name = text, "forward tag declaration");
        self.model
            .scopes
            .get_mut(target)
            .insert(NamespaceKind::Tag, text, binding, at);
        binding
    }

    fn resolve_base(&mut self, name: NodeId, text: &str, composite: NodeId) -> BindingId {
        let found = self.lookup_ordinary(name, text);
        let binding = match found.as_slice() {
            [binding] if matches!(self.kind_of(*binding), BindingKind::Composite(_)) => *binding,
            [_] => return self.problem(ProblemKind::InvalidType, name),
            _ => return self.single(name, &found, ProblemKind::NameNotFound),
        };
        if let Some(own) = self.composite_binding(composite) {
            if binding == own || self.derives_from(binding, own) {
                return self.problem(ProblemKind::CircularInheritance, name);
            }
        }
        binding
    }

    fn resolve_label(&mut self, name: NodeId, text: &str) -> BindingId {
        let Some(function) = enclosing_function(self.ast, name) else {
            return self.problem(ProblemKind::LabelNotFound, name);
        };
        let scope = self.scope_for(function);
        self.ensure_populated(scope);
        let found = self
            .model
            .scopes
            .get(scope)
            .visible(NamespaceKind::Label, text, None);
        self.single(name, &found, ProblemKind::LabelNotFound)
    }

    fn resolve_using(&mut self, name: NodeId, text: &str) -> BindingId {
        let start = self.scope_for(enclosing_scope_node(self.ast, name));
        let at = self.ast.order(name);
        let found = self.lookup(
            start,
            &super::lookup::Lookup {
                namespace: NamespaceKind::Ordinary,
                name: text,
                at: Some(at),
                tag_fallback: false,
                usings: false,
            },
        );
        match found.as_slice() {
            [binding] if self.kind_of(*binding) != BindingKind::Namespace => {
                self.problem(ProblemKind::InvalidUsing, name)
            }
            _ => self.single(name, &found, ProblemKind::NameNotFound),
        }
    }

    fn resolve_call(&mut self, name: NodeId, text: &str, call: NodeId) -> BindingId {
        let candidates = self.lookup_ordinary(name, text);
        if candidates.is_empty() {
            if !self.is_cpp() && self.context.options.implicit_function_declarations {
                return self.implicit_function(text);
            }
            return self.problem(ProblemKind::NameNotFound, name);
        }
        if !self.is_cpp() {
            return self.single(name, &candidates, ProblemKind::NameNotFound);
        }
        let all_functions = candidates.iter().all(|&b| self.kind_of(b).is_function());
        if !all_functions {
            return self.single(name, &candidates, ProblemKind::NameNotFound);
        }
        let arguments = self.call_arguments(call);
        self.select_overload(name, &candidates, &arguments, None)
    }

    pub(crate) fn call_arguments(&self, call: NodeId) -> Vec<NodeId> {
        match self.ast.kind(call) {
            NodeKind::FunctionCallExpression { arguments, .. } => arguments.clone(),
            _ => Vec::new(),
        }
    }

    fn implicit_function(&mut self, text: &str) -> BindingId {
        if let Some(&binding) = self.model.externals.get(text) {
            return binding;
        }
        let global = self.scope_for(self.ast.root());
        let binding = self.model.bindings.alloc(
            text,
            BindingKind::Function(FunctionInfo {
                implicit: true,
                ..FunctionInfo::default()
            }),
            Some(global),
        );
        debug!(name = text, "implicit function declaration");
        self.model.externals.insert(text.to_string(), binding);
        binding
    }

    fn resolve_member(&mut self, name: NodeId, text: &str, reference: NodeId) -> BindingId {
        let NodeKind::FieldReference { owner, arrow, .. } = self.ast.kind(reference) else {
            return self.problem(ProblemKind::MemberNotFound, name);
        };
        let (owner, arrow) = (*owner, *arrow);
        let owner_type = self.expression_type(owner).ty;
        let target = if arrow {
            owner_type.pointee().cloned()
        } else {
            Some(owner_type)
        };
        let Some(target) = target else {
            return self.problem(ProblemKind::MemberNotFound, name);
        };
        let Some(composite) = target.as_composite().map(|c| c.binding) else {
            return self.problem(ProblemKind::MemberNotFound, name);
        };

        let members = self.lookup_member(composite, text);
        if let Some(call) = call_of(self.ast, reference) {
            if self.is_cpp()
                && !members.is_empty()
                && members.iter().all(|&b| self.kind_of(b).is_function())
            {
                let arguments = self.call_arguments(call);
                return self.select_overload(
                    name,
                    &members,
                    &arguments,
                    Some(target.qualifiers()),
                );
            }
        }
        self.single(name, &members, ProblemKind::MemberNotFound)
    }

    fn resolve_designator(&mut self, name: NodeId, text: &str, designator: NodeId) -> BindingId {
        let composite = self
            .designator_owner_type(designator)
            .and_then(|ty| ty.as_composite().map(|c| c.binding));
        let Some(composite) = composite else {
            return self.problem(ProblemKind::MemberNotFound, name);
        };
        let members = self.lookup_member(composite, text);
        self.single(name, &members, ProblemKind::MemberNotFound)
    }

    /// Whether `derived` has `base` among its direct or indirect bases.
    pub(crate) fn derives_from(&mut self, derived: BindingId, base: BindingId) -> bool {
        let mut visited = vec![derived];
        let mut pending = self.bases(derived);
        while let Some(next) = pending.pop() {
            if next == base {
                return true;
            }
            if !visited.contains(&next) {
                visited.push(next);
                pending.extend(self.bases(next));
            }
        }
        false
    }

    /// Definition node of a composite or enumeration binding.
    pub(crate) fn definition_node(&self, binding: BindingId) -> Option<NodeId> {
        let name = self.model.bindings.get(binding).definition?;
        let parent = self.ast.parent(name)?;
        matches!(
            self.ast.kind(parent),
            NodeKind::CompositeTypeSpecifier { .. } | NodeKind::EnumerationSpecifier { .. }
        )
        .then_some(parent)
    }

    /// Direct bases of a class, skipping bases that fail to resolve.
    pub(crate) fn bases(&mut self, class: BindingId) -> Vec<BindingId> {
        let Some(definition) = self.definition_node(class) else {
            return Vec::new();
        };
        let NodeKind::CompositeTypeSpecifier { bases, .. } = self.ast.kind(definition) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for base in bases.clone() {
            if let NodeKind::BaseSpecifier { name } = self.ast.kind(base) {
                let binding = self.resolve(*name);
                if matches!(self.kind_of(binding), BindingKind::Composite(_)) {
                    result.push(binding);
                }
            }
        }
        result
    }
}
