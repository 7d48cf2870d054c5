// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collapse runs of like fragments into list containers
//!
//! Grouping is a lazy adapter over any fragment iterator. It holds at most
//! one open container and one fragment waiting to be handed out after the
//! container that it closed.

use crate::ast::{Container, Fragment, ListKind};

/// Group consecutive members of `kind` in `upstream` into containers.
pub fn group<I>(upstream: I, kind: ListKind) -> Grouped<I>
where
    I: Iterator<Item = Fragment>,
{
    Grouped {
        upstream,
        kind,
        open: None,
        held: None,
    }
}

/// Item runs become bullet lists first, then link runs become link lists.
pub fn group_lists<I>(upstream: I) -> Grouped<Grouped<I>>
where
    I: Iterator<Item = Fragment>,
{
    group(group(upstream, ListKind::Bullet), ListKind::Links)
}

/// Iterator returned by [`group`]
#[derive(Debug)]
pub struct Grouped<I> {
    upstream: I,
    kind: ListKind,
    open: Option<Container>,
    held: Option<Fragment>,
}

impl<I> Iterator for Grouped<I>
where
    I: Iterator<Item = Fragment>,
{
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        if let Some(fragment) = self.held.take() {
            return Some(fragment);
        }

        loop {
            let Some(fragment) = self.upstream.next() else {
                return self.open.take().map(Fragment::List);
            };

            if self.kind.admits(&fragment) {
                match &mut self.open {
                    Some(container) => container.push(fragment),
                    None => self.open = Some(Container::new(self.kind, fragment)),
                }
                continue;
            }

            return match self.open.take() {
                Some(container) => {
                    self.held = Some(fragment);
                    Some(Fragment::List(container))
                }
                None => Some(fragment),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> Fragment {
        Fragment::Item {
            text: text.to_string(),
            italics: None,
        }
    }

    fn link(address: &str) -> Fragment {
        Fragment::Link {
            address: address.to_string(),
            caption: None,
        }
    }

    fn paragraph(text: &str) -> Fragment {
        Fragment::Paragraph {
            text: text.to_string(),
            italics: None,
        }
    }

    fn list(kind: ListKind, items: Vec<Fragment>) -> Fragment {
        let mut items = items.into_iter();
        let mut container = Container::new(kind, items.next().unwrap());
        for item in items {
            container.push(item);
        }
        Fragment::List(container)
    }

    #[test]
    fn test_run_becomes_one_container() {
        let grouped: Vec<_> =
            group(vec![item("a"), item("b")].into_iter(), ListKind::Bullet).collect();
        assert_eq!(grouped, vec![list(ListKind::Bullet, vec![item("a"), item("b")])]);
    }

    #[test]
    fn test_single_member_still_wrapped() {
        let grouped: Vec<_> = group(vec![item("a")].into_iter(), ListKind::Bullet).collect();
        assert_eq!(grouped, vec![list(ListKind::Bullet, vec![item("a")])]);
    }

    #[test]
    fn test_interrupted_run_makes_two_containers() {
        let input = vec![item("a"), paragraph("plain"), item("b")];
        let grouped: Vec<_> = group(input.into_iter(), ListKind::Bullet).collect();
        assert_eq!(
            grouped,
            vec![
                list(ListKind::Bullet, vec![item("a")]),
                paragraph("plain"),
                list(ListKind::Bullet, vec![item("b")]),
            ]
        );
    }

    #[test]
    fn test_non_members_pass_through_in_order() {
        let input = vec![paragraph("one"), link("x.gmi"), paragraph("two")];
        let grouped: Vec<_> = group(input.clone().into_iter(), ListKind::Bullet).collect();
        assert_eq!(grouped, input);
    }

    #[test]
    fn test_kinds_never_mix() {
        let input = vec![item("a"), link("x.gmi"), link("y.gmi"), item("b")];
        let grouped: Vec<_> = group_lists(input.into_iter()).collect();
        assert_eq!(
            grouped,
            vec![
                list(ListKind::Bullet, vec![item("a")]),
                list(ListKind::Links, vec![link("x.gmi"), link("y.gmi")]),
                list(ListKind::Bullet, vec![item("b")]),
            ]
        );
    }

    #[test]
    fn test_adjacent_containers_are_not_merged() {
        let first = list(ListKind::Bullet, vec![item("a")]);
        let second = list(ListKind::Bullet, vec![item("b")]);
        let input = vec![first.clone(), second.clone()];

        let grouped: Vec<_> = group(input.into_iter(), ListKind::Bullet).collect();
        assert_eq!(grouped, vec![first, second]);
    }

    #[test]
    fn test_empty_stream() {
        let grouped: Vec<_> = group_lists(std::iter::empty()).collect();
        assert!(grouped.is_empty());
    }
}
