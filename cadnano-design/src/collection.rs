/*
cadnano, a design engine for DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Read access shared by the collections of a design, and identifier allocation for them.

use std::collections::BTreeMap;
use std::sync::Arc;

pub trait Collection {
    type Key;
    type Item;
    fn get(&self, id: &Self::Key) -> Option<&Self::Item>;
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Self::Key, &'a Self::Item)> + 'a>;
    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Self::Item> + 'a>;
    fn keys<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Self::Key> + 'a>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn contains_key(&self, id: &Self::Key) -> bool;
}

/// An identifier of a design's collection.
pub trait DesignKey: Ord + Copy {
    /// Identifier of the first item of an empty collection.
    const FIRST: Self;
    fn successor(self) -> Self;
}

impl DesignKey for usize {
    const FIRST: Self = 0;
    fn successor(self) -> Self {
        self + 1
    }
}

/// Identifiers are never reused while their item exists: a new item gets the largest identifier
/// in use plus one.
pub(crate) fn next_key<K: DesignKey, V>(map: &BTreeMap<K, V>) -> K {
    map.keys()
        .next_back()
        .map(|k| k.successor())
        .unwrap_or(K::FIRST)
}

/// A collection whose items are shared behind `Arc`s so that cloning it, to snapshot a design
/// before a mutation, is cheap.
pub trait HasMap {
    type Key: DesignKey;
    type Item;
    fn get_map(&self) -> &BTreeMap<Self::Key, Arc<Self::Item>>;
}

impl<T> Collection for T
where
    T: HasMap,
{
    type Key = <T as HasMap>::Key;
    type Item = <T as HasMap>::Item;

    fn get(&self, id: &T::Key) -> Option<&Self::Item> {
        self.get_map().get(id).map(|arc| arc.as_ref())
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Self::Key, &'a Self::Item)> + 'a> {
        Box::new(self.get_map().iter().map(|(id, arc)| (id, arc.as_ref())))
    }

    fn keys<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Self::Key> + 'a> {
        Box::new(self.get_map().keys())
    }

    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Self::Item> + 'a> {
        Box::new(self.get_map().values().map(|arc| arc.as_ref()))
    }

    fn len(&self) -> usize {
        self.get_map().len()
    }

    fn contains_key(&self, id: &Self::Key) -> bool {
        self.get_map().contains_key(id)
    }
}
