use super::Canonicalizer;
use crate::ast::*;
use crate::matcher;
use smallvec::{smallvec, SmallVec};

impl Canonicalizer<'_> {
    pub(super) fn func_decl_fields(&mut self, id: FuncDeclId) {
        if !self.opts.extra_rules {
            return;
        }
        let func = self.file.arena.funcs[id];
        let recv = func.recv.map(|l| self.merge_fields(l));
        let type_params = func.type_params.map(|l| self.merge_fields(l));
        let func = &mut self.file.arena.funcs[id];
        func.recv = recv;
        func.type_params = type_params;
    }

    pub(super) fn signature_fields(&mut self, id: SignatureId) {
        if !self.opts.extra_rules {
            return;
        }
        let sig = self.file.arena.signatures[id];
        let params = self.merge_fields(sig.params);
        let results = sig.results.map(|l| self.merge_fields(l));
        let sig = &mut self.file.arena.signatures[id];
        sig.params = params;
        sig.results = results;
    }

    /// Interface elements; struct fields are never merged.
    pub(super) fn type_fields(&mut self, id: TypeId) {
        if !self.opts.extra_rules {
            return;
        }
        if let Type::Interface { methods, .. } = self.file.arena.types[id] {
            let merged = self.merge_fields(methods);
            if let Type::Interface { methods, .. } = &mut self.file.arena.types[id] {
                *methods = merged;
            }
        }
    }

    /// `a int, b int` becomes `a, b int`.
    fn merge_fields(&mut self, list: FieldList) -> FieldList {
        let ids: SmallVec<[FieldId; 8]> = self.file.arena.list(list.fields).iter().copied().collect();
        if ids.len() < 2 {
            return list;
        }

        let mut kept: SmallVec<[FieldId; 8]> = smallvec![ids[0]];
        let mut last = ids[0];
        for &field in &ids[1..] {
            if self.should_merge(last, field) {
                let arena = self.arena_mut();
                let names: SmallVec<[IdentName; 8]> = arena
                    .list(arena.fields[last].names)
                    .iter()
                    .chain(arena.list(arena.fields[field].names))
                    .copied()
                    .collect();
                arena.fields[last].names = arena.new_list(names);
            } else {
                kept.push(field);
                last = field;
            }
        }

        if kept.len() == ids.len() {
            return list;
        }
        FieldList {
            fields: self.file.arena.new_list(kept),
            ..list
        }
    }

    fn should_merge(&self, a: FieldId, b: FieldId) -> bool {
        let arena = &self.file.arena;
        let (fa, fb) = (arena.fields[a], arena.fields[b]);
        if fa.doc.is_some() || fb.doc.is_some() || fa.comment.is_some() || fb.comment.is_some() {
            return false;
        }
        if fa.names.is_empty() || fb.names.is_empty() || fa.tag.is_some() || fb.tag.is_some() {
            return false;
        }
        if self.line(arena.field_pos(a)) != self.line(arena.field_pos(b)) {
            return false;
        }
        self.is_ident_type(fa.typ) && matcher::equal(self.file, &fa.typ, &fb.typ)
    }

    fn is_ident_type(&self, id: TypeId) -> bool {
        matches!(
            self.file.arena.types[id],
            Type::Named {
                pkg: None,
                args: None,
                ..
            }
        )
    }
}
