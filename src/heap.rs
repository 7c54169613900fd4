//! Capacity-bounded max-heap of the best candidates seen during one search.
use crate::neighbor::Neighbor;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct BoundedNeighborHeap<'a> {
    capacity: usize,
    heap: BinaryHeap<Neighbor<'a>>,
}

impl<'a> BoundedNeighborHeap<'a> {
    pub fn new(capacity: usize) -> Self {
        BoundedNeighborHeap {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Inserts unconditionally while below capacity. Once full, the candidate only gets in
    /// if it beats the current maximum, which is evicted. Returns whether it was kept.
    pub fn offer(&mut self, nb: Neighbor<'a>) -> bool {
        if !self.is_full() {
            self.heap.push(nb);
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut worst) if nb < *worst => {
                // PeekMut restores the heap order on drop.
                *worst = nb;
                true
            }
            _ => false,
        }
    }

    /// Largest retained distance, or infinity while the heap is not full. An unfilled heap
    /// must never justify pruning.
    pub fn current_worst(&self) -> f64 {
        if self.is_full() {
            self.heap.peek().map_or(f64::INFINITY, |nb| nb.dist)
        } else {
            f64::INFINITY
        }
    }

    /// Retained neighbors, in no particular order.
    pub fn into_vec(self) -> Vec<Neighbor<'a>> {
        self.heap.into_vec()
    }

    /// Retained neighbors, closest first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor<'a>> {
        self.heap.into_sorted_vec()
    }
}
