/*
Fixed-capacity indexed binary min-heap keyed by tentative route cost.

Backed by a 1-indexed array of node ids (slot 0 unused). Every structural
move writes the node's new slot back into Node::heap_pos, which lets a key
be updated in place at any known position, decrease or increase, without a
remove-and-reinsert. Capacity is fixed at construction to the exact node
count of the search, so the array never reallocates mid-traversal.
*/

use crate::graph::{Cost, Node, NodeId};

const UNSET: NodeId = NodeId::MAX;

#[derive(Debug)]
pub struct MinHeap {
    // slots[0] is a sentinel; live entries occupy slots[1..=len].
    slots: Vec<NodeId>,
    len: usize,
}

impl MinHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![UNSET; capacity + 1],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len + 1 == self.slots.len()
    }

    /// Appends the node at the next free slot and rises it into place.
    pub fn insert(&mut self, nodes: &mut [Node], id: NodeId) {
        assert!(
            !self.is_full(),
            "heap overflow: capacity {} exhausted inserting node {}",
            self.slots.len() - 1,
            id
        );
        self.len += 1;
        self.slots[self.len] = id;
        nodes[id].heap_pos = self.len;
        self.rise(nodes, self.len);
    }

    /// Swaps the node at `k` upward while it is strictly smaller than its
    /// parent. Returns the final slot.
    fn rise(&mut self, nodes: &mut [Node], mut k: usize) -> usize {
        while k > 1 && nodes[self.slots[k]].dist < nodes[self.slots[k / 2]].dist {
            self.swap(nodes, k, k / 2);
            k /= 2;
        }
        k
    }

    /// The smaller-keyed child of `k`; on a tie between two children the
    /// right child wins. Caller guarantees at least one child exists.
    fn smallest_child(&self, nodes: &[Node], k: usize) -> usize {
        if 2 * k == self.len || nodes[self.slots[2 * k]].dist < nodes[self.slots[2 * k + 1]].dist {
            2 * k
        } else {
            2 * k + 1
        }
    }

    /// Swaps the node at `k` downward while a child is strictly smaller.
    /// Returns the final slot.
    fn sink(&mut self, nodes: &mut [Node], mut k: usize) -> usize {
        while 2 * k <= self.len {
            let child = self.smallest_child(nodes, k);
            if nodes[self.slots[k]].dist <= nodes[self.slots[child]].dist {
                break;
            }
            self.swap(nodes, k, child);
            k = child;
        }
        k
    }

    // The only place heap_pos changes after insertion.
    fn swap(&mut self, nodes: &mut [Node], a: usize, b: usize) {
        self.slots.swap(a, b);
        nodes[self.slots[a]].heap_pos = a;
        nodes[self.slots[b]].heap_pos = b;
    }

    /// Rewrites the key of the node at slot `pos` and repositions it:
    /// rise first, sink if it did not move. Returns the new slot.
    pub fn update_key(&mut self, nodes: &mut [Node], pos: usize, new_dist: Cost) -> usize {
        nodes[self.slots[pos]].dist = new_dist;
        let risen = self.rise(nodes, pos);
        if risen == pos {
            self.sink(nodes, pos)
        } else {
            risen
        }
    }

    /// Removes and returns the minimum node, marking it visited. Its
    /// distance is final from this point on.
    pub fn extract_min(&mut self, nodes: &mut [Node]) -> NodeId {
        assert!(self.len > 0, "extract_min on an empty heap");
        self.swap(nodes, 1, self.len);
        let id = self.slots[self.len];
        self.len -= 1;
        nodes[id].visited = true;
        if self.len > 0 {
            self.sink(nodes, 1);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orx_priority_queue::*;

    fn arena(costs: &[Cost]) -> Vec<Node> {
        costs
            .iter()
            .enumerate()
            .map(|(id, &cost)| {
                let mut node = Node::new(id);
                node.dist = cost;
                node
            })
            .collect()
    }

    fn fill(heap: &mut MinHeap, nodes: &mut [Node]) {
        for id in 0..nodes.len() {
            heap.insert(nodes, id);
        }
    }

    // heap_pos must mirror the backing array after every mutation.
    fn assert_positions(heap: &MinHeap, nodes: &[Node]) {
        for slot in 1..=heap.len {
            assert_eq!(nodes[heap.slots[slot]].heap_pos, slot);
        }
    }

    #[test]
    fn extracts_in_key_order() {
        let mut nodes = arena(&[9.0, 2.0, 7.5, 0.5, 4.0, 11.0, 3.25]);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);
        assert_positions(&heap, &nodes);

        let mut last = Cost::NEG_INFINITY;
        while !heap.is_empty() {
            let id = heap.extract_min(&mut nodes);
            assert!(nodes[id].dist >= last);
            assert!(nodes[id].visited);
            last = nodes[id].dist;
            assert_positions(&heap, &nodes);
        }
        assert_eq!(last, 11.0);
    }

    #[test]
    fn update_key_decrease_moves_to_root() {
        let mut nodes = arena(&[5.0, 6.0, 7.0, 8.0]);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);

        let pos = nodes[3].heap_pos;
        let new_slot = heap.update_key(&mut nodes, pos, 1.0);
        assert_eq!(new_slot, 1);
        assert_eq!(nodes[3].heap_pos, 1);
        assert_positions(&heap, &nodes);
        assert_eq!(heap.extract_min(&mut nodes), 3);
    }

    #[test]
    fn update_key_increase_sinks() {
        let mut nodes = arena(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);

        let pos = nodes[0].heap_pos;
        let new_slot = heap.update_key(&mut nodes, pos, 10.0);
        assert!(new_slot > 1);
        assert_positions(&heap, &nodes);
        assert_eq!(heap.extract_min(&mut nodes), 1);
        // The bumped node now comes out last.
        let mut last_out = UNSET;
        while !heap.is_empty() {
            last_out = heap.extract_min(&mut nodes);
        }
        assert_eq!(last_out, 0);
    }

    #[test]
    fn equal_keys_prefer_right_child() {
        let mut nodes = arena(&[1.0, 5.0, 5.0]);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);
        // Slots: [_, 0, 1, 2]; children of the root tie at 5.0.
        assert_eq!(heap.smallest_child(&nodes, 1), 3);
    }

    #[test]
    fn lone_left_child_is_chosen() {
        let mut nodes = arena(&[1.0, 5.0]);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);
        assert_eq!(heap.smallest_child(&nodes, 1), 2);
    }

    #[test]
    #[should_panic(expected = "heap overflow")]
    fn insert_past_capacity_panics() {
        let mut nodes = arena(&[1.0, 2.0]);
        let mut heap = MinHeap::with_capacity(1);
        heap.insert(&mut nodes, 0);
        heap.insert(&mut nodes, 1);
    }

    #[test]
    #[should_panic(expected = "empty heap")]
    fn extract_from_empty_panics() {
        let mut nodes = arena(&[]);
        let mut heap = MinHeap::with_capacity(4);
        heap.extract_min(&mut nodes);
    }

    // Scripted insert / decrease-key / pop mix compared against the
    // map-backed binary heap from orx-priority-queue. Keys are distinct,
    // so the pop orders must agree exactly.
    #[test]
    fn matches_reference_queue() {
        let initial = [40.0, 12.0, 33.0, 27.0, 8.0, 51.0, 19.0, 45.0, 30.0, 22.0];
        let decreases: [(NodeId, Cost); 4] = [(5, 3.0), (0, 25.0), (7, 14.0), (2, 6.5)];

        let mut nodes = arena(&initial);
        let mut heap = MinHeap::with_capacity(nodes.len());
        fill(&mut heap, &mut nodes);

        let mut reference = BinaryHeapWithMap::<NodeId, Cost>::new();
        for (id, &cost) in initial.iter().enumerate() {
            reference.push(id, cost);
        }

        for &(id, cost) in &decreases {
            let pos = nodes[id].heap_pos;
            heap.update_key(&mut nodes, pos, cost);
            reference.decrease_key_or_push(&id, cost);
            assert_positions(&heap, &nodes);
        }

        while !heap.is_empty() {
            let id = heap.extract_min(&mut nodes);
            let (ref_id, ref_cost) = reference.pop().unwrap();
            assert_eq!(id, ref_id);
            assert_eq!(nodes[id].dist, ref_cost);
        }
        assert!(reference.is_empty());
    }
}
