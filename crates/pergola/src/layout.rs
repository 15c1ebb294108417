//! The layout solver.
//!
//! Layout is two passes over the tree. `measure` walks bottom-up,
//! computing a `Hint` for every widget: leaves via the rehint engine,
//! containers by aggregating their children along the container's axis.
//! `arrange` walks top-down, carving each container's rectangle into
//! child rectangles: fixed children get their hinted extent, flexible
//! children share the leftover space in proportion to their flex weight,
//! never dropping below their hinted minimum.
//!
//! The solver is permissive: children that do not fit simply overflow
//! their container; nothing is clipped or errored here.

use geom::{Direction, Rect, Size};
use slotmap::SecondaryMap;

use crate::{
    error::Result,
    hint::{rehint, Hint, SizeHint},
    style::AlignItems,
    tree::{Tree, WidgetId},
};

pub(crate) fn solve(tree: &mut Tree, avail: Size) -> Result<()> {
    let root = tree.root();
    let mut hints = SecondaryMap::new();
    measure(tree, root, &mut hints)?;
    tree.set_rect(root, avail.rect());
    arrange(tree, root, &hints)
}

/// Bottom-up pass: compute and cache every widget's hint.
fn measure(tree: &Tree, id: WidgetId, hints: &mut SecondaryMap<WidgetId, Hint>) -> Result<Hint> {
    let children: Vec<WidgetId> = tree.children_of(id).to_vec();
    let style = tree.style(id)?.clone();

    let hint = if children.is_empty() {
        match tree.content_of(id) {
            Some(content) => rehint(Some(content), &style),
            // A bare leaf is a spacer: explicit extents hold, flex-styled
            // axes grow from zero, everything else collapses.
            None => {
                let axis = |explicit: Option<f64>| match explicit {
                    Some(v) => SizeHint::fixed(v),
                    None if style.flex() > 0.0 => SizeHint::at_least(0.0),
                    None => SizeHint::fixed(0.0),
                };
                Hint {
                    width: axis(style.width()),
                    height: axis(style.height()),
                    preserve_aspect_ratio: false,
                }
            }
        }
    } else {
        let mut main_sum = 0.0f64;
        let mut cross_max = 0.0f64;
        for child in children {
            let ch = measure(tree, child, hints)?;
            let margin = tree.style(child)?.margin();
            let (main, cross) = match style.direction() {
                Direction::Row => (
                    ch.width.value + margin.horizontal(),
                    ch.height.value + margin.vertical(),
                ),
                Direction::Column => (
                    ch.height.value + margin.vertical(),
                    ch.width.value + margin.horizontal(),
                ),
            };
            main_sum += main;
            cross_max = cross_max.max(cross);
        }
        let (natural_w, natural_h) = match style.direction() {
            Direction::Row => (main_sum, cross_max),
            Direction::Column => (cross_max, main_sum),
        };
        let axis = |explicit: Option<f64>, natural: f64| match explicit {
            Some(v) => SizeHint::fixed(v),
            None => SizeHint::at_least(natural),
        };
        Hint {
            width: axis(style.width(), natural_w),
            height: axis(style.height(), natural_h),
            preserve_aspect_ratio: false,
        }
    };

    hints.insert(id, hint);
    Ok(hint)
}

struct Child {
    id: WidgetId,
    hint: Hint,
    lead_main: f64,
    trail_main: f64,
    lead_cross: f64,
    margin_cross: f64,
    flex: f64,
    min_main: f64,
    flexible_main: bool,
    explicit_cross: bool,
}

/// Top-down pass: place each container's children into its rectangle.
fn arrange(tree: &mut Tree, id: WidgetId, hints: &SecondaryMap<WidgetId, Hint>) -> Result<()> {
    let children: Vec<WidgetId> = tree.children_of(id).to_vec();
    if children.is_empty() {
        return Ok(());
    }
    let rect = tree.rect(id)?;
    let style = tree.style(id)?.clone();
    let direction = style.direction();
    let align = style.align_items();

    let (avail_main, avail_cross) = match direction {
        Direction::Row => (rect.w, rect.h),
        Direction::Column => (rect.h, rect.w),
    };

    let mut items = Vec::with_capacity(children.len());
    for child in children {
        let hint = hints.get(child).copied().unwrap_or_else(Hint::empty);
        let cs = tree.style(child)?;
        let margin = cs.margin();
        let flex = cs.flex();
        let (lead_main, trail_main, lead_cross, margin_cross, main_hint, explicit_cross) =
            match direction {
                Direction::Row => (
                    margin.left,
                    margin.right,
                    margin.top,
                    margin.vertical(),
                    hint.width,
                    cs.height().is_some(),
                ),
                Direction::Column => (
                    margin.top,
                    margin.bottom,
                    margin.left,
                    margin.horizontal(),
                    hint.height,
                    cs.width().is_some(),
                ),
            };
        items.push(Child {
            id: child,
            hint,
            lead_main,
            trail_main,
            lead_cross,
            margin_cross,
            flex,
            min_main: main_hint.value,
            flexible_main: main_hint.flexible && flex > 0.0,
            explicit_cross,
        });
    }

    // Distribute the main axis. Fixed children take their hinted extent;
    // flexible children split the remainder by flex weight, pinned at
    // their minimum when their proportional share would undercut it.
    let margins: f64 = items.iter().map(|c| c.lead_main + c.trail_main).sum();
    let fixed: f64 = items
        .iter()
        .filter(|c| !c.flexible_main)
        .map(|c| c.min_main)
        .sum();
    let mut pool = (avail_main - margins - fixed).max(0.0);

    let mut main_sizes: Vec<f64> = items.iter().map(|c| c.min_main).collect();
    let mut remaining: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].flexible_main)
        .collect();
    loop {
        let total_flex: f64 = remaining.iter().map(|&i| items[i].flex).sum();
        if total_flex <= 0.0 {
            break;
        }
        let pinned = remaining
            .iter()
            .position(|&i| pool * items[i].flex / total_flex < items[i].min_main);
        match pinned {
            Some(pos) => {
                let i = remaining.swap_remove(pos);
                main_sizes[i] = items[i].min_main;
                pool = (pool - items[i].min_main).max(0.0);
            }
            None => {
                for &i in &remaining {
                    main_sizes[i] = pool * items[i].flex / total_flex;
                }
                break;
            }
        }
    }

    // Place sequentially along the main axis; resolve the cross axis per
    // child from the container's alignment.
    let mut cursor = 0.0f64;
    for (i, item) in items.iter().enumerate() {
        cursor += item.lead_main;
        let main = main_sizes[i];

        let free_cross = (avail_cross - item.margin_cross).max(0.0);
        let hinted = match direction {
            Direction::Row => item.hint.height.value,
            Direction::Column => item.hint.width.value,
        };
        // Stretch fills the available cross space unless the child has an
        // explicit cross dimension. Nothing is ever shrunk below its
        // hinted minimum; a child too big for its container overflows.
        let cross = match align {
            AlignItems::Stretch if !item.explicit_cross => free_cross.max(hinted),
            _ => hinted,
        };
        let cross_offset = item.lead_cross
            + match align {
                AlignItems::Start | AlignItems::Stretch => 0.0,
                AlignItems::Center => ((free_cross - cross) / 2.0).max(0.0),
                AlignItems::End => (free_cross - cross).max(0.0),
            };

        let child_rect = match direction {
            Direction::Row => Rect::new(rect.tl.x + cursor, rect.tl.y + cross_offset, main, cross),
            Direction::Column => {
                Rect::new(rect.tl.x + cross_offset, rect.tl.y + cursor, cross, main)
            }
        };
        tree.set_rect(item.id, child_rect);
        cursor += main + item.trail_main;
    }

    let ids: Vec<WidgetId> = items.iter().map(|c| c.id).collect();
    for child in ids {
        arrange(tree, child, hints)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use geom::Inset;

    use super::*;
    use crate::{content::FixedContent, style::Style};

    fn fixed_leaf(t: &mut Tree, parent: WidgetId, w: f64, h: f64) -> Result<WidgetId> {
        let id = t.add_child(parent, Style::new())?;
        t.set_content(id, Some(Box::new(FixedContent::new(w, h))))?;
        Ok(id)
    }

    fn flex_leaf(t: &mut Tree, parent: WidgetId, flex: f64) -> Result<WidgetId> {
        t.add_child(parent, Style::new().with_flex(flex))
    }

    #[test]
    fn column_stacks_fixed_children() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = fixed_leaf(&mut t, root, 100.0, 30.0)?;
        let b = fixed_leaf(&mut t, root, 100.0, 50.0)?;
        t.layout(Size::new(200.0, 200.0))?;
        // Stretch is the default alignment, so both children fill the
        // container's width.
        assert_eq!(t.rect(a)?, Rect::new(0.0, 0.0, 200.0, 30.0));
        assert_eq!(t.rect(b)?, Rect::new(0.0, 30.0, 200.0, 50.0));
        Ok(())
    }

    #[test]
    fn row_places_left_to_right() -> Result<()> {
        let mut t = Tree::new(Style::new().with_direction(Direction::Row));
        let root = t.root();
        let a = fixed_leaf(&mut t, root, 40.0, 40.0)?;
        let b = fixed_leaf(&mut t, root, 60.0, 40.0)?;
        t.layout(Size::new(200.0, 100.0))?;
        assert_eq!(t.rect(a)?, Rect::new(0.0, 0.0, 40.0, 100.0));
        assert_eq!(t.rect(b)?, Rect::new(40.0, 0.0, 60.0, 100.0));
        Ok(())
    }

    #[test]
    fn flex_shares_leftover_by_weight() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let fixed = fixed_leaf(&mut t, root, 100.0, 40.0)?;
        let a = flex_leaf(&mut t, root, 1.0)?;
        let b = flex_leaf(&mut t, root, 3.0)?;
        t.layout(Size::new(100.0, 240.0))?;
        assert_eq!(t.rect(fixed)?.h, 40.0);
        assert_eq!(t.rect(a)?.h, 50.0);
        assert_eq!(t.rect(b)?.h, 150.0);
        assert_eq!(t.rect(b)?.tl.y, 90.0);
        Ok(())
    }

    #[test]
    fn flexible_child_pinned_at_minimum() -> Result<()> {
        // 300 of headroom; the big child's proportional share (150) is
        // below its 200 minimum, so it pins there and the rest flows to
        // the other child.
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let big = t.add_child(root, Style::new().with_flex(1.0))?;
        t.set_content(big, Some(Box::new(FixedContent::new(50.0, 200.0))))?;
        let small = flex_leaf(&mut t, root, 1.0)?;
        t.layout(Size::new(100.0, 300.0))?;
        assert_eq!(t.rect(big)?.h, 200.0);
        assert_eq!(t.rect(small)?.h, 100.0);
        Ok(())
    }

    #[test]
    fn margins_reserved_before_distribution() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let a = t.add_child(
            t.root(),
            Style::new().with_flex(1.0).with_margin(Inset::uniform(10.0)),
        )?;
        t.layout(Size::new(100.0, 120.0))?;
        assert_eq!(t.rect(a)?, Rect::new(10.0, 10.0, 80.0, 100.0));
        Ok(())
    }

    #[test]
    fn cross_axis_alignment() -> Result<()> {
        for (align, x) in [
            (AlignItems::Start, 0.0),
            (AlignItems::Center, 70.0),
            (AlignItems::End, 140.0),
        ] {
            let mut t = Tree::new(Style::new().with_align_items(align));
            let root = t.root();
            let a = fixed_leaf(&mut t, root, 60.0, 40.0)?;
            t.layout(Size::new(200.0, 100.0))?;
            assert_eq!(t.rect(a)?.tl.x, x);
            assert_eq!(t.rect(a)?.w, 60.0);
        }
        Ok(())
    }

    #[test]
    fn cross_axis_fixed_minimum_overflows() -> Result<()> {
        // A 100-wide child in an 80-wide column sizes to its hint and
        // overflows rather than shrinking.
        for align in [AlignItems::Start, AlignItems::Center, AlignItems::End] {
            let mut t = Tree::new(Style::new().with_align_items(align));
            let root = t.root();
            let a = fixed_leaf(&mut t, root, 100.0, 30.0)?;
            t.layout(Size::new(80.0, 100.0))?;
            assert_eq!(t.rect(a)?.w, 100.0);
            assert_eq!(t.rect(a)?.tl.x, 0.0);
        }
        Ok(())
    }

    #[test]
    fn stretch_skips_explicit_cross_dimension() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = flex_leaf(&mut t, root, 1.0)?;
        let b = t.add_child(root, Style::new().with_width(50.0).with_height(20.0))?;
        t.layout(Size::new(200.0, 100.0))?;
        assert_eq!(t.rect(a)?.w, 200.0);
        // An explicit cross extent wins over stretch.
        assert_eq!(t.rect(b)?.w, 50.0);
        Ok(())
    }

    #[test]
    fn stretch_fills_cross_for_content_leaves() -> Result<()> {
        // Intrinsic content size is a minimum, not a cap: under the
        // default stretch alignment the child widens to the container.
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = fixed_leaf(&mut t, root, 100.0, 30.0)?;
        t.layout(Size::new(200.0, 200.0))?;
        assert_eq!(t.rect(a)?.w, 200.0);

        // In a container narrower than the content, stretch never
        // shrinks below the hinted minimum.
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let b = fixed_leaf(&mut t, root, 100.0, 30.0)?;
        t.layout(Size::new(80.0, 200.0))?;
        assert_eq!(t.rect(b)?.w, 100.0);
        Ok(())
    }

    #[test]
    fn zero_space_collapses_flexible_children() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = flex_leaf(&mut t, root, 1.0)?;
        let b = flex_leaf(&mut t, root, 1.0)?;
        t.layout(Size::new(0.0, 0.0))?;
        assert_eq!(t.rect(a)?.h, 0.0);
        assert_eq!(t.rect(b)?.h, 0.0);
        Ok(())
    }

    #[test]
    fn overflow_is_permitted() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = fixed_leaf(&mut t, root, 100.0, 80.0)?;
        let b = fixed_leaf(&mut t, root, 100.0, 80.0)?;
        t.layout(Size::new(100.0, 100.0))?;
        assert_eq!(t.rect(a)?.h, 80.0);
        // The second child overflows the viewport rather than shrinking.
        assert_eq!(t.rect(b)?.tl.y, 80.0);
        assert_eq!(t.rect(b)?.h, 80.0);
        Ok(())
    }

    #[test]
    fn nested_containers() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let row = t.add_child(
            t.root(),
            Style::new().with_direction(Direction::Row).with_flex(1.0),
        )?;
        let left = fixed_leaf(&mut t, row, 80.0, 30.0)?;
        let right = t.add_child(row, Style::new().with_flex(1.0))?;
        let footer = t.add_child(t.root(), Style::new().with_height(20.0))?;
        t.layout(Size::new(200.0, 120.0))?;
        assert_eq!(t.rect(row)?, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(t.rect(left)?.w, 80.0);
        assert_eq!(t.rect(right)?, Rect::new(80.0, 0.0, 120.0, 100.0));
        // An explicit height does not stop the footer stretching wide.
        assert_eq!(t.rect(footer)?, Rect::new(0.0, 100.0, 200.0, 20.0));
        Ok(())
    }

    #[test]
    fn native_handles_receive_bounds() -> Result<()> {
        use crate::backend::headless::HeadlessHandle;

        let mut t = Tree::new(Style::new());
        let root = t.root();
        let a = fixed_leaf(&mut t, root, 100.0, 30.0)?;
        let handle = HeadlessHandle::new();
        let bounds = handle.bounds();
        t.set_native(a, Some(Box::new(handle)))?;
        t.layout(Size::new(200.0, 200.0))?;
        assert_eq!(*bounds.lock().unwrap(), Some(Rect::new(0.0, 0.0, 200.0, 30.0)));
        Ok(())
    }
}
