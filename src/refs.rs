use pdf_writer::Ref;
use std::collections::HashMap;

/// Every kind of indirect object a document writes
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(usize),
    Image(usize),
    ImageMask(usize),
}

/// Hands out object ids and remembers which object each one belongs to
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, ref_type: RefType) -> Option<Ref> {
        self.refs.get(&ref_type).copied()
    }

    /// The id of an object, allocating one the first time it is asked for
    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        if let Some(id) = self.get(ref_type) {
            return id;
        }
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        self.refs.insert(ref_type, id);
        id
    }
}
