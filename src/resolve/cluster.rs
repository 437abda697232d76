use ahash::AHashMap;

/// Union-find over dense indices, with path halving and union by rank.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    /// Create `n` singleton sets.
    pub(crate) fn new(n: usize) -> Self {
        Self { parent: (0..n).collect(), rank: vec![0; n] }
    }

    /// Representative of the set containing `x`.
    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Join the sets containing `a` and `b`. Returns false if they were already joined.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb { return false }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Connected components of the undirected graph on `n` nodes given by `edges`.
///
/// Only nodes touched by at least one edge are reported. Each component is sorted,
/// and components are ordered by their smallest member.
pub(crate) fn connected_components(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut sets = DisjointSets::new(n);
    let mut in_graph = vec![false; n];
    for &(a, b) in edges {
        sets.union(a, b);
        in_graph[a] = true;
        in_graph[b] = true;
    }

    let mut slot = AHashMap::<usize, usize>::new();
    let mut components = Vec::<Vec<usize>>::new();
    for node in (0..n).filter(|&node| in_graph[node]) {
        let root = sets.find(node);
        let k = *slot.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[k].push(node);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_joins_transitively() {
        let mut sets = DisjointSets::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(1, 2));
        assert!(!sets.union(0, 2));
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(3));
    }

    #[test]
    fn components_are_ordered_and_sorted() {
        let components = connected_components(7, &[(5, 6), (3, 1), (1, 4), (6, 2)]);
        assert_eq!(components, vec![vec![1, 3, 4], vec![2, 5, 6]]);
    }

    #[test]
    fn isolated_nodes_are_not_components() {
        assert!(connected_components(3, &[]).is_empty());
        assert_eq!(connected_components(3, &[(0, 2)]), vec![vec![0, 2]]);
    }

    #[test]
    fn self_loops_form_single_node_components() {
        assert_eq!(connected_components(2, &[(1, 1)]), vec![vec![1]]);
    }
}
