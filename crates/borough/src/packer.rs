//! Growing guillotine bin packer.
//!
//! Rectangles are placed largest-first into a binary tree of cells. Placing a rectangle marks a
//! free cell as used and splits the remainder into a `right` strip and a `down` strip. When no
//! free cell fits, the container grows to the right or downwards, whichever keeps it closer to
//! square, and the old root becomes a child of the new one.

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Cell {
    fn free(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Cell arena plus the current root.
struct Bin {
    cells: Vec<Cell>,
    root: usize,
}

impl Bin {
    fn new(w: f64, h: f64) -> Self {
        Self {
            cells: vec![Cell::free(0.0, 0.0, w, h)],
            root: 0,
        }
    }

    fn push(&mut self, cell: Cell) -> usize {
        self.cells.push(cell);
        self.cells.len() - 1
    }

    /// First free cell in pre-order (`right` before `down`) that can hold `w x h`.
    fn find(&self, w: f64, h: f64) -> Option<usize> {
        let mut stack = vec![self.root];
        while let Some(ix) = stack.pop() {
            let cell = &self.cells[ix];
            if cell.used {
                stack.extend(cell.down);
                stack.extend(cell.right);
            } else if w <= cell.w && h <= cell.h {
                return Some(ix);
            }
        }
        None
    }

    fn split(&mut self, ix: usize, w: f64, h: f64) -> usize {
        let Cell { x, y, w: cw, h: ch, .. } = self.cells[ix];
        let down = self.push(Cell::free(x, y + h, cw, ch - h));
        let right = self.push(Cell::free(x + w, y, cw - w, h));
        let cell = &mut self.cells[ix];
        cell.used = true;
        cell.down = Some(down);
        cell.right = Some(right);
        ix
    }

    fn grow(&mut self, w: f64, h: f64) -> usize {
        let root = self.cells[self.root];
        let can_grow_down = w <= root.w;
        let can_grow_right = h <= root.h;
        let should_grow_right = can_grow_right && root.h >= root.w + w;
        let should_grow_down = can_grow_down && root.w >= root.h + h;

        if should_grow_right {
            self.grow_right(w, h)
        } else if should_grow_down {
            self.grow_down(w, h)
        } else if can_grow_right {
            self.grow_right(w, h)
        } else if can_grow_down {
            self.grow_down(w, h)
        } else {
            // Blocks are placed largest-area first, so a block never exceeds the root on both axes.
            unreachable!("block {w}x{h} is larger than the container on both axes")
        }
    }

    fn grow_right(&mut self, w: f64, h: f64) -> usize {
        let old = self.root;
        let Cell { w: rw, h: rh, .. } = self.cells[old];
        tracing::trace!(width = rw + w, height = rh, "growing container to the right");
        let strip = self.push(Cell::free(rw, 0.0, w, rh));
        self.root = self.push(Cell {
            used: true,
            down: Some(old),
            right: Some(strip),
            ..Cell::free(0.0, 0.0, rw + w, rh)
        });
        self.place_after_growth(w, h)
    }

    fn grow_down(&mut self, w: f64, h: f64) -> usize {
        let old = self.root;
        let Cell { w: rw, h: rh, .. } = self.cells[old];
        tracing::trace!(width = rw, height = rh + h, "growing container downwards");
        let strip = self.push(Cell::free(0.0, rh, rw, h));
        self.root = self.push(Cell {
            used: true,
            down: Some(strip),
            right: Some(old),
            ..Cell::free(0.0, 0.0, rw, rh + h)
        });
        self.place_after_growth(w, h)
    }

    fn place_after_growth(&mut self, w: f64, h: f64) -> usize {
        match self.find(w, h) {
            Some(ix) => self.split(ix, w, h),
            None => unreachable!("freshly grown strip cannot hold block {w}x{h}"),
        }
    }

    fn size(&self) -> (f64, f64) {
        let root = &self.cells[self.root];
        (root.w, root.h)
    }
}

#[derive(Debug, Clone)]
struct Block {
    name: String,
    w: f64,
    h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub name: String,
    /// Position of the rectangle in [`RectanglePacker::add`] order.
    pub index: usize,
    /// Top-left corner of the visible rectangle, centered within its padded cell.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Packing {
    pub width: f64,
    pub height: f64,
    /// Placements in packing order (largest area first).
    pub placements: Vec<Placement>,
}

impl Packing {
    pub fn position_of(&self, name: &str) -> Option<(f64, f64)> {
        self.placements
            .iter()
            .rev()
            .find(|p| p.name == name)
            .map(|p| (p.x, p.y))
    }
}

#[derive(Debug, Clone)]
pub struct RectanglePacker {
    spacing: f64,
    blocks: Vec<Block>,
}

impl RectanglePacker {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing: spacing.max(0.0),
            blocks: Vec::new(),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, width: f64, height: f64) -> &mut Self {
        self.blocks.push(Block {
            name: name.into(),
            w: width.max(0.0) + self.spacing,
            h: height.max(0.0) + self.spacing,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Packs every added rectangle. Equal areas keep their insertion order.
    pub fn fit(&self) -> Packing {
        let mut order: Vec<usize> = (0..self.blocks.len()).collect();
        order.sort_by(|&a, &b| {
            let area = |ix: usize| self.blocks[ix].w * self.blocks[ix].h;
            area(b).total_cmp(&area(a))
        });

        let Some(&first) = order.first() else {
            return Packing::default();
        };
        let mut bin = Bin::new(self.blocks[first].w, self.blocks[first].h);
        let margin = self.spacing / 2.0;

        let placements = order
            .into_iter()
            .map(|ix| {
                let block = &self.blocks[ix];
                let cell = match bin.find(block.w, block.h) {
                    Some(cell) => bin.split(cell, block.w, block.h),
                    None => bin.grow(block.w, block.h),
                };
                let cell = &bin.cells[cell];
                Placement {
                    name: block.name.clone(),
                    index: ix,
                    x: cell.x + margin,
                    y: cell.y + margin,
                    width: block.w - self.spacing,
                    height: block.h - self.spacing,
                }
            })
            .collect();

        let (width, height) = bin.size();
        Packing {
            width,
            height,
            placements,
        }
    }
}
