//! Scene graph arena: objects, dirty tracking, batched cleaning.

use smallvec::SmallVec;
use std::fmt;

use super::{CachedTransformations, Feature, Transformation};
use crate::util::{Error, Result};

/// Transformation is out of date, transitively set on all
/// descendants.
const DIRTY: u8 = 1 << 0;
/// Scratch mark of an in-flight `transformations()` call.
const VISITED: u8 = 1 << 1;
/// The node is a requested object or a meeting point of two request
/// paths; scratch mark of an in-flight `transformations()` call.
const JOINT: u8 = 1 << 2;

/// Counter value meaning "not assigned to any joint list slot".
const COUNTER_UNUSED: u16 = 0xffff;

/// Identifies one object within its [`SceneGraph`].
///
/// Ids are only meaningful for the graph that created them; handing
/// an id to a different graph indexes into unrelated nodes or panics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node<T: Transformation> {
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    features: Vec<Box<dyn Feature<T>>>,
    transformation: T,
    is_scene: bool,
    flags: u8,
    counter: u16,
}

/// A forest of scene objects with dirty tracking.
///
/// The arena owns every node; links are ids, children keep their
/// append order. Roots created with [`add_scene()`](Self::add_scene)
/// are scenes; only objects transitively attached to a scene can be
/// batch-cleaned. `VISITED`/`JOINT` scratch marks and the per-node
/// counter are only touched inside
/// [`transformations()`](Self::transformations) and are restored
/// before it returns, on the error paths too, so calls can't observe
/// each other's state. Concurrent calls on overlapping subtrees are
/// ruled out by `&mut self`.
pub struct SceneGraph<T: Transformation> {
    nodes: Vec<Node<T>>,
}

impl<T: Transformation> SceneGraph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a scene root.
    ///
    /// A scene has no parent, an identity transformation and anchors
    /// one tree; a graph may hold several scenes plus any number of
    /// detached subtrees.
    pub fn add_scene(&mut self) -> NodeId {
        let id = self.push(None, T::identity(), true);
        log::debug!("SceneGraph: added scene {:?}", id);
        id
    }

    /// Add an object with an identity transformation.
    pub fn add_object(&mut self, parent: Option<NodeId>) -> NodeId {
        self.push(parent, T::identity(), false)
    }

    /// Add an object with the given local transformation.
    pub fn add_object_with(&mut self, parent: Option<NodeId>, transformation: T) -> NodeId {
        self.push(parent, transformation, false)
    }

    fn push(&mut self, parent: Option<NodeId>, transformation: T, is_scene: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: SmallVec::new(),
            features: Vec::new(),
            transformation,
            is_scene,
            flags: DIRTY,
            counter: COUNTER_UNUSED,
        });
        if parent.is_some() {
            self.set_parent(id, parent);
        }
        id
    }

    /// Number of nodes in the graph.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether this node is a scene root.
    #[inline]
    pub fn is_scene(&self, id: NodeId) -> bool {
        self.nodes[id.index()].is_scene
    }

    /// Parent of an object, `None` for roots.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Children of an object, in attachment order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// The scene this object belongs to, `None` when its tree is not
    /// rooted in a scene.
    pub fn scene(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if self.nodes[current.index()].is_scene {
                return Some(current);
            }
            current = self.nodes[current.index()].parent?;
        }
    }

    /// The object's local transformation.
    #[inline]
    pub fn transformation(&self, id: NodeId) -> &T {
        &self.nodes[id.index()].transformation
    }

    /// Replace the local transformation and mark the subtree dirty.
    /// Does nothing on a scene.
    pub fn set_transformation(&mut self, id: NodeId, transformation: T) {
        if self.nodes[id.index()].is_scene {
            return;
        }
        self.nodes[id.index()].transformation = transformation;
        self.set_dirty(id);
    }

    /// Attach a feature to an object.
    pub fn add_feature(&mut self, id: NodeId, feature: impl Feature<T> + 'static) {
        self.nodes[id.index()].features.push(Box::new(feature));
    }

    /// Reparent an object, appending it to the new parent's children.
    ///
    /// Does nothing when `id` is a scene, when the parent is already
    /// current, or when the new parent is `id` itself or one of its
    /// descendants (that would close a cycle). Otherwise the object's
    /// subtree goes dirty.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if self.nodes[id.index()].is_scene || self.nodes[id.index()].parent == parent {
            return;
        }

        // An object can't be parented under its own subtree
        let mut ancestor = parent;
        while let Some(current) = ancestor {
            if current == id {
                return;
            }
            ancestor = self.nodes[current.index()].parent;
        }

        if let Some(old) = self.nodes[id.index()].parent {
            let children = &mut self.nodes[old.index()].children;
            if let Some(position) = children.iter().position(|&child| child == id) {
                children.remove(position);
            }
        }

        self.nodes[id.index()].parent = parent;
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }

        self.set_dirty(id);
    }

    /// Absolute transformation of an object: composition of local
    /// transformations from its root down. Walks the whole ancestor
    /// chain every call; batch queries should use
    /// [`transformations()`](Self::transformations).
    pub fn absolute_transformation(&self, id: NodeId) -> T {
        let node = &self.nodes[id.index()];
        match node.parent {
            None => node.transformation.clone(),
            Some(parent) => T::compose(
                &self.absolute_transformation(parent),
                &node.transformation,
            ),
        }
    }

    /// Whether the object's absolute transformation is out of date.
    #[inline]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes[id.index()].flags & DIRTY != 0
    }

    /// Mark an object and all its descendants dirty, notifying their
    /// features. A dirty object implies a dirty subtree, so marked
    /// subtrees are skipped.
    pub fn set_dirty(&mut self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.index()];
            if node.flags & DIRTY != 0 {
                continue;
            }
            for feature in &mut node.features {
                feature.mark_dirty();
            }
            node.flags |= DIRTY;
            stack.extend(node.children.iter().copied());
        }
    }

    /// Clean a single object.
    ///
    /// Climbs to the first clean ancestor (adopting its absolute
    /// transformation as the base; identity at a root), then cleans
    /// every collected object top-down, delivering cached matrices to
    /// features along the way.
    pub fn set_clean(&mut self, id: NodeId) {
        if !self.is_dirty(id) {
            return;
        }

        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        let mut base = T::identity();
        let mut current = id;
        loop {
            stack.push(current);
            match self.nodes[current.index()].parent {
                None => break,
                Some(parent) => {
                    if !self.is_dirty(parent) {
                        base = self.absolute_transformation(parent);
                        break;
                    }
                    current = parent;
                }
            }
        }

        while let Some(object) = stack.pop() {
            base = T::compose(&base, &self.nodes[object.index()].transformation.clone());
            self.clean_node(object, &base);
        }
    }

    /// Clean several objects at once.
    ///
    /// Already-clean objects are skipped; the scene is derived from
    /// the first dirty one (an object without a scene can't be
    /// cleaned). Absolute transformations come from one
    /// [`transformations()`](Self::transformations) pass, so shared
    /// ancestor paths are composed only once.
    pub fn set_clean_many(&mut self, objects: &[NodeId]) -> Result<()> {
        let dirty: Vec<NodeId> = objects
            .iter()
            .copied()
            .filter(|&id| self.is_dirty(id))
            .collect();
        if dirty.is_empty() {
            return Ok(());
        }

        let scene = self.scene(dirty[0]).ok_or(Error::Detached)?;
        let transformations = self.transformations(scene, &dirty, T::identity())?;
        for (&id, absolute) in dirty.iter().zip(&transformations) {
            self.clean_node(id, absolute);
        }
        Ok(())
    }

    /// Compute absolute transformations for `objects`, in order, with
    /// `initial` applied on top of the scene root.
    ///
    /// `scene` must be a scene and every object must live in its
    /// tree. Each object in the requested set becomes a *joint*, as
    /// does every ancestor where two request paths meet; the
    /// transformation of the path between neighbouring joints is
    /// composed exactly once, so large overlapping requests don't
    /// redo shared ancestor work. Duplicate objects are allowed and
    /// yield identical results.
    pub fn transformations(
        &mut self,
        scene: NodeId,
        objects: &[NodeId],
        initial: T,
    ) -> Result<Vec<T>> {
        const OP: &str = "SceneGraph::transformations()";

        if !self.nodes[scene.index()].is_scene {
            return Err(Error::NotScene);
        }
        if objects.len() >= COUNTER_UNUSED as usize {
            return Err(Error::TooManyObjects {
                op: OP,
                count: objects.len(),
            });
        }

        // Mark the requested objects as joints. On duplicates the
        // first occurrence keeps its counter; the rest are patched
        // from it at the end.
        for (position, &id) in objects.iter().enumerate() {
            let node = &mut self.nodes[id.index()];
            if node.counter != COUNTER_UNUSED {
                continue;
            }
            node.counter = position as u16;
            node.flags |= JOINT;
        }
        let mut joints: Vec<NodeId> = objects.to_vec();

        // Walk every path up until it hits an already-visited node, a
        // joint or the root, promoting meeting points to joints. The
        // visited log exists so an error can restore the marks.
        let mut working: Vec<NodeId> = objects.to_vec();
        let mut visited: Vec<NodeId> = Vec::new();
        let mut failed: Option<Error> = None;
        'walk: while let Some(&id) = working.first() {
            if self.nodes[id.index()].flags & VISITED != 0 {
                // Duplicate occurrence, its path is already covered
                working.swap_remove(0);
                continue;
            }
            self.nodes[id.index()].flags |= VISITED;
            visited.push(id);

            match self.nodes[id.index()].parent {
                None => {
                    if id != scene {
                        failed = Some(Error::ForeignObject);
                        break 'walk;
                    }
                    working.swap_remove(0);
                }
                Some(parent) => {
                    let parent_flags = self.nodes[parent.index()].flags;
                    if parent_flags & (VISITED | JOINT) != 0 {
                        working.swap_remove(0);
                        if parent_flags & JOINT == 0 {
                            // Two paths meet here; promote to joint
                            if joints.len() >= COUNTER_UNUSED as usize {
                                failed = Some(Error::TooManyObjects {
                                    op: OP,
                                    count: joints.len(),
                                });
                                break 'walk;
                            }
                            let node = &mut self.nodes[parent.index()];
                            node.counter = joints.len() as u16;
                            node.flags |= JOINT;
                            joints.push(parent);
                        }
                    } else {
                        // Climb one step, staying on this path
                        working[0] = parent;
                    }
                }
            }
        }

        if let Some(error) = failed {
            for id in visited {
                self.nodes[id.index()].flags &= !VISITED;
            }
            self.restore_joints(&joints);
            return Err(error);
        }

        log::trace!(
            "SceneGraph: computing transformations of {} objects via {} joints",
            objects.len(),
            joints.len()
        );

        // Compose transformations between neighbouring joints; the
        // walk down also clears the visited marks
        let mut results: Vec<T> = vec![T::identity(); joints.len()];
        for joint in 0..joints.len() {
            self.compute_joint(&joints, &mut results, joint, &initial);
        }

        // Later occurrences of duplicate objects copy the first one
        for (position, &id) in objects.iter().enumerate() {
            let counter = self.nodes[id.index()].counter as usize;
            if counter != position {
                results[position] = results[counter].clone();
            }
        }

        self.restore_joints(&joints);

        results.truncate(objects.len());
        Ok(results)
    }

    /// Compute absolute transformation matrices for `objects`.
    pub fn transformation_matrices(
        &mut self,
        scene: NodeId,
        objects: &[NodeId],
        initial: T::Matrix,
    ) -> Result<Vec<T::Matrix>> {
        let transformations = self.transformations(scene, objects, T::from_matrix(initial))?;
        Ok(transformations
            .iter()
            .map(Transformation::to_matrix)
            .collect())
    }

    /// Compute the absolute transformation of one joint, recursing
    /// into the parent joint and clearing visited marks along the
    /// walked path. A joint without the visited mark is already
    /// computed (or a duplicate occurrence) and is left alone.
    fn compute_joint(&mut self, joints: &[NodeId], results: &mut [T], joint: usize, initial: &T) {
        let id = joints[joint];
        if self.nodes[id.index()].flags & VISITED == 0 {
            return;
        }

        results[joint] = self.nodes[id.index()].transformation.clone();

        let mut current = id;
        loop {
            self.nodes[current.index()].flags &= !VISITED;

            match self.nodes[current.index()].parent {
                None => {
                    results[joint] = T::compose(initial, &results[joint]);
                    return;
                }
                Some(parent) if self.nodes[parent.index()].flags & JOINT != 0 => {
                    let parent_joint = self.nodes[parent.index()].counter as usize;
                    self.compute_joint(joints, results, parent_joint, initial);
                    results[joint] = T::compose(&results[parent_joint].clone(), &results[joint]);
                    return;
                }
                Some(parent) => {
                    let parent_transformation = self.nodes[parent.index()].transformation.clone();
                    results[joint] = T::compose(&parent_transformation, &results[joint]);
                    current = parent;
                }
            }
        }
    }

    /// Clear joint marks and counters after a `transformations()`
    /// pass, unconditionally. Duplicate occurrences share their node
    /// with the first one, resetting twice is harmless.
    fn restore_joints(&mut self, joints: &[NodeId]) {
        for &id in joints {
            let node = &mut self.nodes[id.index()];
            node.flags &= !JOINT;
            node.counter = COUNTER_UNUSED;
        }
    }

    /// Apply a freshly computed absolute transformation: deliver the
    /// matrices features asked for, computing each at most once, and
    /// clear the dirty flag.
    fn clean_node(&mut self, id: NodeId, absolute: &T) {
        let node = &mut self.nodes[id.index()];
        let mut matrix: Option<T::Matrix> = None;
        let mut inverted: Option<T::Matrix> = None;
        for feature in &mut node.features {
            let wanted = feature.cached_transformations();
            if wanted.contains(CachedTransformations::ABSOLUTE) {
                let matrix = matrix.get_or_insert_with(|| absolute.to_matrix());
                feature.clean(matrix);
            }
            if wanted.contains(CachedTransformations::INVERTED_ABSOLUTE) {
                let inverted = inverted.get_or_insert_with(|| absolute.inverted().to_matrix());
                feature.clean_inverted(inverted);
            }
        }
        node.flags &= !DIRTY;
    }
}

impl<T: Transformation> Default for SceneGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transformation> fmt::Debug for SceneGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec3, Mat4};
    use std::cell::Cell;
    use std::rc::Rc;

    fn translation(x: f32) -> Mat4 {
        Mat4::from_translation(vec3(x, 0.0, 0.0))
    }

    /// Feature recording every notification it receives.
    struct Recorder {
        wanted: CachedTransformations,
        dirtied: Rc<Cell<u32>>,
        cleaned: Rc<Cell<u32>>,
        last_matrix: Rc<Cell<Option<Mat4>>>,
        last_inverted: Rc<Cell<Option<Mat4>>>,
    }

    impl Recorder {
        fn new(wanted: CachedTransformations) -> Self {
            Self {
                wanted,
                dirtied: Rc::new(Cell::new(0)),
                cleaned: Rc::new(Cell::new(0)),
                last_matrix: Rc::new(Cell::new(None)),
                last_inverted: Rc::new(Cell::new(None)),
            }
        }
    }

    impl Feature<Mat4> for Recorder {
        fn cached_transformations(&self) -> CachedTransformations {
            self.wanted
        }

        fn mark_dirty(&mut self) {
            self.dirtied.set(self.dirtied.get() + 1);
        }

        fn clean(&mut self, absolute: &Mat4) {
            self.cleaned.set(self.cleaned.get() + 1);
            self.last_matrix.set(Some(*absolute));
        }

        fn clean_inverted(&mut self, inverted: &Mat4) {
            self.last_inverted.set(Some(*inverted));
        }
    }

    #[test]
    fn test_tree_links() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let b = graph.add_object(Some(a));
        let c = graph.add_object(Some(a));

        assert!(graph.is_scene(scene));
        assert!(!graph.is_scene(a));
        assert_eq!(graph.parent(a), Some(scene));
        assert_eq!(graph.children(a), &[b, c]);
        assert_eq!(graph.scene(c), Some(scene));

        let detached = graph.add_object(None);
        assert_eq!(graph.scene(detached), None);
    }

    #[test]
    fn test_set_parent_reparents_and_appends() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let b = graph.add_object(Some(scene));
        let c = graph.add_object(Some(a));

        graph.set_parent(c, Some(b));
        assert_eq!(graph.children(a), &[] as &[NodeId]);
        assert_eq!(graph.children(b), &[c]);
        assert_eq!(graph.parent(c), Some(b));
    }

    #[test]
    fn test_set_parent_refuses_cycles_and_scenes() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let b = graph.add_object(Some(a));

        // A scene can't get a parent
        graph.set_parent(scene, Some(a));
        assert_eq!(graph.parent(scene), None);

        // An object can't be parented to itself or its descendant
        graph.set_parent(a, Some(a));
        assert_eq!(graph.parent(a), Some(scene));
        graph.set_parent(a, Some(b));
        assert_eq!(graph.parent(a), Some(scene));
        assert_eq!(graph.parent(b), Some(a));
    }

    #[test]
    fn test_absolute_transformation() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));
        let b = graph.add_object_with(Some(a), translation(2.0));

        assert_eq!(
            graph.absolute_transformation(b),
            translation(1.0) * translation(2.0)
        );
        // A detached object is its own reference frame
        let lone = graph.add_object_with(None, translation(5.0));
        assert_eq!(graph.absolute_transformation(lone), translation(5.0));
    }

    #[test]
    fn test_dirty_propagates_down() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let b = graph.add_object(Some(a));

        graph.set_clean(b);
        assert!(!graph.is_dirty(a));
        assert!(!graph.is_dirty(b));

        let recorder = Recorder::new(CachedTransformations::NONE);
        let dirtied = recorder.dirtied.clone();
        graph.add_feature(b, recorder);

        graph.set_transformation(a, translation(1.0));
        assert!(graph.is_dirty(a));
        assert!(graph.is_dirty(b));
        assert_eq!(dirtied.get(), 1);

        // Marking again is a no-op while still dirty
        graph.set_transformation(a, translation(2.0));
        assert_eq!(dirtied.get(), 1);
    }

    #[test]
    fn test_set_transformation_on_scene_is_ignored() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        graph.set_transformation(scene, translation(4.0));
        assert_eq!(*graph.transformation(scene), Mat4::IDENTITY);
    }

    #[test]
    fn test_set_clean_single() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));
        let b = graph.add_object_with(Some(a), translation(2.0));

        let recorder = Recorder::new(CachedTransformations::ABSOLUTE);
        let cleaned = recorder.cleaned.clone();
        let last = recorder.last_matrix.clone();
        graph.add_feature(b, recorder);

        graph.set_clean(b);
        assert!(!graph.is_dirty(b));
        assert!(!graph.is_dirty(a));
        assert_eq!(cleaned.get(), 1);
        assert_eq!(last.get(), Some(translation(1.0) * translation(2.0)));

        // Cleaning a clean object does nothing
        graph.set_clean(b);
        assert_eq!(cleaned.get(), 1);

        // A clean ancestor's absolute transformation is adopted as
        // the base instead of walking to the root
        graph.set_transformation(b, translation(7.0));
        assert!(!graph.is_dirty(a));
        graph.set_clean(b);
        assert_eq!(last.get(), Some(translation(1.0) * translation(7.0)));
    }

    #[test]
    fn test_clean_inverted_computed_once() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(3.0));

        let recorder = Recorder::new(
            CachedTransformations::ABSOLUTE | CachedTransformations::INVERTED_ABSOLUTE,
        );
        let last_inverted = recorder.last_inverted.clone();
        graph.add_feature(a, recorder);

        graph.set_clean(a);
        let inverted = last_inverted.get().unwrap();
        assert!(inverted.abs_diff_eq(translation(-3.0), 1e-6));
    }

    #[test]
    fn test_transformations_chain() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));
        let b = graph.add_object_with(Some(a), translation(2.0));
        let c = graph.add_object_with(Some(b), translation(4.0));

        let results = graph
            .transformations(scene, &[c, a], Mat4::IDENTITY)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            translation(1.0) * translation(2.0) * translation(4.0)
        );
        assert_eq!(results[1], translation(1.0));

        // All scratch state is restored
        for id in [scene, a, b, c] {
            let node = &graph.nodes[id.index()];
            assert_eq!(node.counter, COUNTER_UNUSED);
            assert_eq!(node.flags & (VISITED | JOINT), 0);
        }
    }

    #[test]
    fn test_transformations_initial_applies_at_root() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));

        let results = graph.transformations(scene, &[a], translation(10.0)).unwrap();
        assert_eq!(results[0], translation(10.0) * translation(1.0));
    }

    #[test]
    fn test_transformations_shares_paths() {
        // Two requests meeting at a shared ancestor promote it to a
        // joint; both results compose through it
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let root = graph.add_object_with(Some(scene), translation(1.0));
        let shared = graph.add_object_with(Some(root), translation(2.0));
        let left = graph.add_object_with(Some(shared), translation(4.0));
        let right = graph.add_object_with(Some(shared), translation(8.0));

        let results = graph
            .transformations(scene, &[left, right], Mat4::IDENTITY)
            .unwrap();
        let shared_absolute = translation(1.0) * translation(2.0);
        assert_eq!(results[0], shared_absolute * translation(4.0));
        assert_eq!(results[1], shared_absolute * translation(8.0));

        for id in [scene, root, shared, left, right] {
            let node = &graph.nodes[id.index()];
            assert_eq!(node.counter, COUNTER_UNUSED);
            assert_eq!(node.flags & (VISITED | JOINT), 0);
        }
    }

    #[test]
    fn test_transformations_duplicates() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));
        let b = graph.add_object_with(Some(a), translation(2.0));

        let results = graph
            .transformations(scene, &[b, a, b, b], Mat4::IDENTITY)
            .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0], translation(1.0) * translation(2.0));
        assert_eq!(results[1], translation(1.0));
        assert_eq!(results[2], results[0]);
        assert_eq!(results[3], results[0]);

        for id in [a, b] {
            let node = &graph.nodes[id.index()];
            assert_eq!(node.counter, COUNTER_UNUSED);
            assert_eq!(node.flags & (VISITED | JOINT), 0);
        }
    }

    #[test]
    fn test_transformations_of_scene_itself() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let results = graph
            .transformations(scene, &[scene], translation(3.0))
            .unwrap();
        assert_eq!(results[0], translation(3.0));
    }

    #[test]
    fn test_transformations_requires_scene() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));

        let err = graph.transformations(a, &[a], Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, Error::NotScene));
        assert_eq!(
            err.to_string(),
            "SceneGraph::transformations(): the caller is not a scene"
        );
    }

    #[test]
    fn test_transformations_foreign_object_restores_marks() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let stray_root = graph.add_object(None);
        let stray = graph.add_object(Some(stray_root));

        let err = graph
            .transformations(scene, &[a, stray], Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, Error::ForeignObject));

        // The failed call must leave no scratch state behind
        for id in [scene, a, stray_root, stray] {
            let node = &graph.nodes[id.index()];
            assert_eq!(node.counter, COUNTER_UNUSED);
            assert_eq!(node.flags & (VISITED | JOINT), 0);
        }

        // And the graph is immediately usable again
        let results = graph.transformations(scene, &[a], Mat4::IDENTITY).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_set_clean_many() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object_with(Some(scene), translation(1.0));
        let b = graph.add_object_with(Some(a), translation(2.0));
        let c = graph.add_object_with(Some(a), translation(4.0));

        let recorder = Recorder::new(CachedTransformations::ABSOLUTE);
        let b_matrix = recorder.last_matrix.clone();
        graph.add_feature(b, recorder);
        let recorder = Recorder::new(CachedTransformations::ABSOLUTE);
        let c_matrix = recorder.last_matrix.clone();
        graph.add_feature(c, recorder);

        graph.set_clean_many(&[b, c]).unwrap();
        assert!(!graph.is_dirty(b));
        assert!(!graph.is_dirty(c));
        // The shared parent stays dirty; only requested objects are
        // cleaned
        assert!(graph.is_dirty(a));
        assert_eq!(b_matrix.get(), Some(translation(1.0) * translation(2.0)));
        assert_eq!(c_matrix.get(), Some(translation(1.0) * translation(4.0)));

        // A second call sees only clean objects and does nothing
        graph.set_clean_many(&[b, c]).unwrap();
    }

    #[test]
    fn test_set_clean_many_detached() {
        let mut graph = SceneGraph::<Mat4>::new();
        let root = graph.add_object(None);
        let child = graph.add_object(Some(root));

        let err = graph.set_clean_many(&[child]).unwrap_err();
        assert!(matches!(err, Error::Detached));
    }

    #[test]
    fn test_too_many_objects() {
        let mut graph = SceneGraph::<Mat4>::new();
        let scene = graph.add_scene();
        let a = graph.add_object(Some(scene));
        let objects = vec![a; 0xffff];
        let err = graph
            .transformations(scene, &objects, Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, Error::TooManyObjects { .. }));
    }
}
