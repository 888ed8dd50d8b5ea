//! File-level declaration rules: separation, lone-declaration merging,
//! group flattening and import grouping.

use super::Canonicalizer;
use crate::ast::*;
use crate::error::CanonError;
use crate::matcher;
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::debug;

type SpecBuf = SmallVec<[Spec; 16]>;

impl Canonicalizer<'_> {
    fn top_decls(&self) -> Vec<TopLevelDecl> {
        self.file.arena.list(self.file.root.decls).to_vec()
    }

    /// Multi-line top-level declarations that touch get a blank line between
    /// them. Leading comments count as part of the declaration.
    pub(super) fn separate_top_level(&mut self) -> Result<(), CanonError> {
        let mut last_multi = false;
        let mut last_end = self.file.root.name.pos.end;
        for decl in self.top_decls() {
            let mut pos = self.file.arena.top_decl_pos(decl);
            if let Some(first) = self.comments.between(last_end, pos).first() {
                pos = first.start;
            }
            let end = self.file.arena.top_decl_end(decl);

            let multi = self.line(pos) < self.line(end);
            if multi && last_multi && self.line(last_end) + 1 == self.line(pos) {
                self.file.lines.insert_break(last_end)?;
            }
            last_multi = multi;
            last_end = end;
        }
        Ok(())
    }

    /// Regroups the import groups present in the source, before lone imports
    /// are merged into them.
    pub(super) fn group_existing_imports(&mut self) -> Result<(), CanonError> {
        for decl in self.top_decls() {
            let TopLevelDecl::Gen(id) = decl else {
                continue;
            };
            if self.needs_import_grouping(id) {
                self.join_std_imports(id)?;
                self.grouped.insert(id.raw());
            }
        }
        Ok(())
    }

    /// Single-spec groups are flattened before merging, so a flattened
    /// declaration can join its neighbors in the same pass.
    pub(super) fn flatten_top_level(&mut self) -> Result<(), CanonError> {
        for decl in self.top_decls() {
            if let TopLevelDecl::Gen(id) = decl {
                self.flatten_group(id)?;
            }
        }
        Ok(())
    }

    /// Folds runs of unparenthesized `var`, `const` or `import` declarations
    /// on consecutive lines into the first declaration of the run.
    pub(super) fn merge_lone_decls(&mut self) -> Result<(), CanonError> {
        let decls = self.top_decls();
        let mut kept: Vec<TopLevelDecl> = Vec::with_capacity(decls.len());

        let mut i = 0;
        while i < decls.len() {
            let current = decls[i];
            kept.push(current);
            i += 1;

            let TopLevelDecl::Gen(start) = current else {
                continue;
            };
            let head = self.file.arena.decls[start];
            if !is_mergeable(head.kind) || self.is_cgo_import(&head) {
                continue;
            }

            let mut specs: Vec<Spec> = self.file.arena.list(head.specs).to_vec();
            let mut r_paren = head.r_paren;
            let mut last_pos = head.kw_pos.start;
            let mut merged = 0usize;

            while let Some(&TopLevelDecl::Gen(next_id)) = decls.get(i) {
                let next = self.file.arena.decls[next_id];
                if next.kind != head.kind
                    || next.l_paren.is_some()
                    || self.is_cgo_import(&next)
                    || self.line(last_pos) + 1 < self.line(next.kw_pos.start)
                {
                    break;
                }
                specs.extend_from_slice(self.file.arena.list(next.specs));

                let end = self.file.arena.gen_decl_end(next_id);
                let inline = self
                    .comments
                    .inline_at(&self.file.arena, &self.file.lines, end);
                if let Some(c) = inline {
                    // keep the comment inside the group
                    r_paren = Some(Span::empty_at(self.file.arena.comments[c].pos.end));
                }
                last_pos = next.kw_pos.start;
                merged += 1;
                i += 1;
            }

            if merged > 0 {
                let list = self.file.arena.new_list(specs);
                let decl = &mut self.file.arena.decls[start];
                decl.specs = list;
                decl.r_paren = r_paren;
                self.grouped.remove(&start.raw());
                debug!(kind = head.kind.keyword(), merged, "merged lone declarations");
            }
        }

        if kept.len() != decls.len() {
            self.file.root.decls = self.file.arena.new_list(kept);
        }
        Ok(())
    }

    /// `var ()` and friends print nothing useful.
    pub(super) fn drop_empty_groups(&mut self) {
        let decls = self.top_decls();
        let arena = &self.file.arena;
        let kept: Vec<TopLevelDecl> = decls
            .iter()
            .copied()
            .filter(|decl| match *decl {
                TopLevelDecl::Gen(id) => !arena.decls[id].specs.is_empty(),
                TopLevelDecl::Func(_) => true,
            })
            .collect();
        if kept.len() != decls.len() {
            debug!(dropped = decls.len() - kept.len(), "dropped empty groups");
            self.file.root.decls = self.file.arena.new_list(kept);
        }
    }

    /// Rules for a declaration reached by the traversal.
    pub(super) fn gen_decl(&mut self, id: DeclId) -> Result<(), CanonError> {
        if !self.grouped.contains(&id.raw()) && self.needs_import_grouping(id) {
            self.join_std_imports(id)?;
        }
        self.flatten_group(id)
    }

    fn needs_import_grouping(&self, id: DeclId) -> bool {
        let decl = self.file.arena.decls[id];
        decl.kind == GenDeclKind::Import && (decl.l_paren.is_some() || decl.specs.len() > 1)
    }

    /// `var (\n\tx = 1\n)` becomes `var x = 1`, unless the group has a doc
    /// comment. Comments between the keyword and the spec end up above the
    /// declaration.
    pub(super) fn flatten_group(&mut self, id: DeclId) -> Result<(), CanonError> {
        let decl = self.file.arena.decls[id];
        if decl.kind == GenDeclKind::Type
            || decl.l_paren.is_none()
            || decl.doc.is_some()
            || decl.specs.len() != 1
        {
            return Ok(());
        }
        let Some(r_paren) = decl.r_paren else {
            return Ok(());
        };
        let spec = self.file.arena.list(decl.specs)[0];
        let spec_pos = self.file.arena.spec_pos(&spec);
        let spec_end = self.file.arena.spec_end(&spec);

        let kw_line = self.line(decl.kw_pos.start);
        let first_comment = self
            .comments
            .between(decl.kw_pos.start, spec_pos)
            .first()
            .map(|group| group.start);
        match first_comment {
            None => {
                let spec_line = self.line(spec_pos);
                self.file.lines.remove_lines(kw_line, spec_line)?;
            }
            Some(comment_pos) => {
                // the comments take over the keyword's line
                let comment_line = self.line(comment_pos);
                self.file.lines.remove_lines(kw_line, comment_line)?;
                self.file.arena.decls[id].kw_pos = Span::empty_at(spec_pos);
            }
        }
        let (end_line, close_line) = (self.line(spec_end), self.line(r_paren.start));
        self.file.lines.remove_lines(end_line, close_line)?;

        let decl = &mut self.file.arena.decls[id];
        decl.l_paren = None;
        decl.r_paren = None;
        debug!(kind = decl.kind.keyword(), "flattened single-spec group");
        Ok(())
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn is_cgo_import(&self, decl: &GenDecl) -> bool {
        decl.kind == GenDeclKind::Import
            && self.file.arena.list(decl.specs).iter().any(|spec| {
                matches!(spec, Spec::Import(s) if unquote(self.file.text(s.path.value)) == "C")
            })
    }

    /// Standard library paths have no dot in their first element and are
    /// not inside the module being formatted.
    fn is_std_import(&self, path: Symbol) -> bool {
        let path = unquote(self.file.text(path));
        let first = path.split('/').next().unwrap_or_default();
        if first.contains('.') {
            return false;
        }
        match self.opts.module_path.as_deref() {
            Some(module) => path
                .strip_prefix(module)
                .map_or(true, |rest| !rest.is_empty() && !rest.starts_with('/')),
            None => true,
        }
    }

    /// Moves standard library imports into the first run of the group and
    /// separates them from the rest by a blank line.
    fn join_std_imports(&mut self, id: DeclId) -> Result<(), CanonError> {
        let decl = self.file.arena.decls[id];
        let specs: SpecBuf = self.file.arena.list(decl.specs).iter().copied().collect();

        let mut std = SpecBuf::new();
        let mut other = SpecBuf::new();
        let mut first_group = true;
        let mut last_line = 0;
        let mut moved = 0usize;
        // moved specs take slots at the keyword, so the run ends no later
        // than its last unmoved spec
        let mut std_end_line = self.line(decl.kw_pos.start);

        for (i, &spec) in specs.iter().enumerate() {
            let Spec::Import(import) = spec else {
                other.push(spec);
                continue;
            };
            let line = self.line(self.file.arena.spec_pos(&spec));
            if i > 0 && first_group && line > last_line + 1 {
                first_group = false;
            } else {
                last_line = line;
            }

            if !self.is_std_import(import.path.value) {
                first_group = false;
                other.push(spec);
                continue;
            }
            // named or commented imports outside the first run stay put
            if !first_group && (import.name.is_some() || import.comment.is_some()) {
                other.push(spec);
                continue;
            }
            if first_group {
                let end_line = self.line(self.file.arena.spec_end(&spec));
                std_end_line = std_end_line.max(end_line);
                std.push(spec);
                continue;
            }
            let next_pos = specs
                .get(i + 1)
                .map(|next| self.file.arena.spec_pos(next))
                .or(decl.r_paren.map(|r| r.start));
            let prev = i.checked_sub(1).and_then(|j| specs.get(j));
            if self.alone_on_line(prev, &spec, next_pos) {
                // the vacated line goes away with the spec
                self.file.lines.merge_line(line - 1)?;
            }
            std.push(matcher::restamp(self.file, &spec, decl.kw_pos.start));
            moved += 1;
        }

        if let Some(first_other) = other.first().filter(|_| !std.is_empty()) {
            let other_pos = self.file.arena.spec_pos(first_other);
            if std_end_line + 1 >= self.line(other_pos) {
                self.file.lines.insert_break(other_pos.saturating_sub(1))?;
                self.file.lines.insert_break(other_pos)?;
            }
        }

        let list = self.file.arena.new_list(std.into_iter().chain(other));
        self.file.arena.decls[id].specs = list;

        if moved > 0 {
            debug!(moved, "moved std imports to the first group");
            self.sort_imports(id);
        }
        Ok(())
    }

    fn alone_on_line(&self, prev: Option<&Spec>, spec: &Spec, next_pos: Option<u32>) -> bool {
        let line = self.line(self.file.arena.spec_pos(spec));
        let end_line = self.line(self.file.arena.spec_end(spec));
        prev.map_or(true, |p| self.line(self.file.arena.spec_end(p)) < line)
            && next_pos.map_or(true, |pos| self.line(pos) > end_line)
    }

    /// Sorts each run of imports by path and drops exact duplicates. Sorted
    /// specs take over the positions of the run in order, so line structure
    /// is kept.
    fn sort_imports(&mut self, id: DeclId) {
        let specs: Vec<Spec> = self.file.arena.list(self.file.arena.decls[id].specs).to_vec();
        let mut out: Vec<Spec> = Vec::with_capacity(specs.len());

        let mut start = 0;
        for i in 1..=specs.len() {
            let run_ends = i == specs.len() || {
                let prev_end = self.file.arena.spec_end(&specs[i - 1]);
                let next_pos = self.file.arena.spec_pos(&specs[i]);
                self.line(next_pos) > self.line(prev_end) + 1
            };
            if run_ends {
                self.sort_run(&specs[start..i], &mut out);
                start = i;
            }
        }

        let list = self.file.arena.new_list(out);
        self.file.arena.decls[id].specs = list;
    }

    fn sort_run(&mut self, run: &[Spec], out: &mut Vec<Spec>) {
        let mut slots: SpecPositions = run
            .iter()
            .map(|spec| self.file.arena.spec_pos(spec))
            .collect();
        slots.sort_unstable();

        let mut sorted: SpecBuf = run.iter().copied().collect();
        sorted.sort_by(|a, b| self.compare_imports(a, b));
        sorted.dedup_by(|b, a| self.compare_imports(a, b) == Ordering::Equal);

        for (spec, slot) in sorted.into_iter().zip(slots) {
            if self.file.arena.spec_pos(&spec) == slot {
                out.push(spec);
            } else {
                out.push(matcher::restamp(self.file, &spec, slot));
            }
        }
    }

    fn compare_imports(&self, a: &Spec, b: &Spec) -> Ordering {
        let key = |spec: &Spec| match spec {
            Spec::Import(s) => {
                let name = match s.name {
                    Some(ImportName::Dot(_)) => ".",
                    Some(ImportName::Name(n)) => self.file.text(n.sym),
                    None => "",
                };
                (unquote(self.file.text(s.path.value)), name)
            }
            _ => ("", ""),
        };
        key(a).cmp(&key(b))
    }
}

type SpecPositions = SmallVec<[u32; 16]>;

fn is_mergeable(kind: GenDeclKind) -> bool {
    matches!(
        kind,
        GenDeclKind::Var | GenDeclKind::Const | GenDeclKind::Import
    )
}

fn unquote(lit: &str) -> &str {
    lit.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| lit.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(lit)
}
