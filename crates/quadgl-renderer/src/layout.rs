use crate::gl::{DataType, VertexAttrib};

/// One attribute of a vertex: `count` components of `data_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayoutElement {
    pub count: u32,
    pub normalized: bool,
    pub data_type: DataType,
}

impl VertexLayoutElement {
    pub const fn new(count: u32, data_type: DataType, normalized: bool) -> Self {
        Self {
            count,
            normalized,
            data_type,
        }
    }

    pub const fn float(count: u32) -> Self {
        Self::new(count, DataType::Float, false)
    }

    /// Size of the element in bytes.
    pub const fn size(&self) -> usize {
        self.count as usize * self.data_type.size()
    }
}

/// Ordered description of the attributes packed into a vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    elements: Vec<VertexLayoutElement>,
    stride: usize,
}

impl VertexLayout {
    pub fn new(elements: impl Into<Vec<VertexLayoutElement>>) -> Self {
        let elements = elements.into();
        let stride = elements.iter().map(VertexLayoutElement::size).sum();
        Self { elements, stride }
    }

    pub fn elements(&self) -> &[VertexLayoutElement] {
        &self.elements
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Attribute bindings for this layout, numbered from `first_index`.
    pub fn attributes(&self, first_index: u32) -> impl Iterator<Item = VertexAttrib> + '_ {
        let stride = self.stride;
        self.elements
            .iter()
            .scan(0usize, |offset, element| {
                let start = *offset;
                *offset += element.size();
                Some((start, element))
            })
            .zip(first_index..)
            .map(move |((offset, element), index)| VertexAttrib {
                index,
                count: element.count,
                data_type: element.data_type,
                normalized: element.normalized,
                stride,
                offset,
            })
    }
}
