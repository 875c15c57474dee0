use proptest::prelude::*;

use crate::{
    jvm::references::ClassRef,
    types::field_type::{FieldType, PrimitiveType},
};

pub(crate) fn arb_class_name() -> impl Strategy<Value = String> {
    let arb_ident = prop::string::string_regex(r"[a-zA-Z][\w\$_]*").expect("The regex is invalid");
    prop::collection::vec(arb_ident, 1..10).prop_map(|v| v.join("/"))
}

pub(crate) fn arb_non_array_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        any::<PrimitiveType>().prop_map(FieldType::Base),
        arb_class_name()
            .prop_map(ClassRef::new)
            .prop_map(FieldType::Object),
    ]
}

prop_compose! {
    fn arb_array_field_type()(
        t in arb_non_array_field_type(),
        dim in 1..=u8::MAX
    ) -> FieldType {
        FieldType::array_of(t, dim)
    }
}

pub(crate) fn arb_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![arb_non_array_field_type(), arb_array_field_type()]
}

/// Assembles the bytes of a minimal class file: a constant pool, the super types and member
/// declarations, each member carrying one opaque attribute.
#[derive(Debug)]
pub(crate) struct ClassFileBuilder {
    pool: Vec<Vec<u8>>,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<(u16, u16, u16)>,
    methods: Vec<(u16, u16, u16)>,
}

impl ClassFileBuilder {
    pub(crate) fn new(name: &str, super_class: Option<&str>) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };
        builder.this_class = builder.class(name);
        if let Some(super_class) = super_class {
            builder.super_class = builder.class(super_class);
        }
        builder
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut entry = vec![1];
        let length = u16::try_from(value.len()).expect("The string is too long");
        entry.extend_from_slice(&length.to_be_bytes());
        entry.extend_from_slice(value.as_bytes());
        self.push(entry)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![7];
        entry.extend_from_slice(&name_index.to_be_bytes());
        self.push(entry)
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.pool.push(entry);
        u16::try_from(self.pool.len()).expect("Too many constants")
    }

    pub(crate) fn interface(mut self, name: &str) -> Self {
        let index = self.class(name);
        self.interfaces.push(index);
        self
    }

    pub(crate) fn field(mut self, access_flags: u16, name: &str, descriptor: &str) -> Self {
        let member = (access_flags, self.utf8(name), self.utf8(descriptor));
        self.fields.push(member);
        self
    }

    pub(crate) fn method(mut self, access_flags: u16, name: &str, descriptor: &str) -> Self {
        let member = (access_flags, self.utf8(name), self.utf8(descriptor));
        self.methods.push(member);
        self
    }

    pub(crate) fn build(mut self) -> Vec<u8> {
        let attribute_name = self.utf8("Synthetic");
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x41];
        let pool_count = u16::try_from(self.pool.len() + 1).expect("Too many constants");
        bytes.extend_from_slice(&pool_count.to_be_bytes());
        for entry in &self.pool {
            bytes.extend_from_slice(entry);
        }
        bytes.extend_from_slice(&0x0021u16.to_be_bytes());
        bytes.extend_from_slice(&self.this_class.to_be_bytes());
        bytes.extend_from_slice(&self.super_class.to_be_bytes());
        bytes.extend_from_slice(&u16::try_from(self.interfaces.len()).unwrap().to_be_bytes());
        for index in &self.interfaces {
            bytes.extend_from_slice(&index.to_be_bytes());
        }
        for members in [&self.fields, &self.methods] {
            bytes.extend_from_slice(&u16::try_from(members.len()).unwrap().to_be_bytes());
            for &(access_flags, name, descriptor) in members {
                bytes.extend_from_slice(&access_flags.to_be_bytes());
                bytes.extend_from_slice(&name.to_be_bytes());
                bytes.extend_from_slice(&descriptor.to_be_bytes());
                // One attribute with a two byte payload.
                bytes.extend_from_slice(&1u16.to_be_bytes());
                bytes.extend_from_slice(&attribute_name.to_be_bytes());
                bytes.extend_from_slice(&2u32.to_be_bytes());
                bytes.extend_from_slice(&[0xAB, 0xCD]);
            }
        }
        // No class attributes.
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes
    }
}
