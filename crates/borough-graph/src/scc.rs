//! Strongly connected components (Tarjan).
//!
//! The traversal keeps its own frame stack instead of recursing, so long dependency chains do
//! not exhaust the thread stack.

const UNVISITED: usize = usize::MAX;

struct Frame {
    v: usize,
    successors: Vec<usize>,
    next: usize,
}

struct Tarjan {
    next_index: usize,
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(node_count: usize) -> Self {
        Self {
            next_index: 0,
            index: vec![UNVISITED; node_count],
            lowlink: vec![0; node_count],
            on_stack: vec![false; node_count],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn open<F, I>(&mut self, v: usize, successors: &mut F, frames: &mut Vec<Frame>)
    where
        F: FnMut(usize) -> I,
        I: IntoIterator<Item = usize>,
    {
        let node_count = self.index.len();
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        frames.push(Frame {
            v,
            successors: successors(v)
                .into_iter()
                .filter(|&w| w < node_count)
                .collect(),
            next: 0,
        });
    }

    fn close(&mut self, v: usize) {
        let mut component: Vec<usize> = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.push(w);
            if w == v {
                break;
            }
        }
        // Popped in reverse push order; members are contiguous on the stack.
        component.reverse();
        self.components.push(component);
    }

    fn run<F, I>(&mut self, root: usize, successors: &mut F)
    where
        F: FnMut(usize) -> I,
        I: IntoIterator<Item = usize>,
    {
        let mut frames: Vec<Frame> = Vec::new();
        self.open(root, successors, &mut frames);

        while let Some(frame) = frames.last_mut() {
            let v = frame.v;
            if let Some(&w) = frame.successors.get(frame.next) {
                frame.next += 1;
                if self.index[w] == UNVISITED {
                    self.open(w, successors, &mut frames);
                } else if self.on_stack[w] {
                    self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                }
                continue;
            }

            frames.pop();
            if let Some(parent) = frames.last() {
                self.lowlink[parent.v] = self.lowlink[parent.v].min(self.lowlink[v]);
            }
            if self.lowlink[v] == self.index[v] {
                self.close(v);
            }
        }
    }
}

/// Computes the strongly connected components of the graph over nodes `0..node_count`.
///
/// Roots are tried in ascending id order and `successors(v)` is consumed in the order given,
/// so identical input always yields identical output. Components are returned in completion
/// order; each lists its members in discovery order. Successor ids outside `0..node_count` are
/// ignored.
pub fn strongly_connected_components<F, I>(node_count: usize, mut successors: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize) -> I,
    I: IntoIterator<Item = usize>,
{
    let mut tarjan = Tarjan::new(node_count);
    for v in 0..node_count {
        if tarjan.index[v] == UNVISITED {
            tarjan.run(v, &mut successors);
        }
    }
    tarjan.components
}

/// Like [`strongly_connected_components`], keeping only components with more than one member.
pub fn cycles<F, I>(node_count: usize, successors: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize) -> I,
    I: IntoIterator<Item = usize>,
{
    strongly_connected_components(node_count, successors)
        .into_iter()
        .filter(|c| c.len() > 1)
        .collect()
}
