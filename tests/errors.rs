//! Malformed input is rejected with a precise error and no listing.

mod common;

use classscope::{disassemble, ClassFile, Error};
use common::{u2s, ClassBuilder, PUBLIC_STATIC};

fn method_with_code(code: &[u8]) -> Vec<u8> {
    let mut class = ClassBuilder::new("demo/Bad");
    let code = class.code(2, 2, code, &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);
    class.build()
}

#[test]
fn wrong_magic() {
    let mut bytes = common::hello_world();
    bytes[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::NotAClassFile(0xDEAD_BEEF))
    ));
}

#[test]
fn unknown_constant_pool_tag() {
    let mut class = ClassBuilder::new("demo/Bad");
    class.pool.raw(&[2, 0, 0], 1);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn constant_value_out_of_range() {
    let mut class = ClassBuilder::new("demo/Bad");
    let constant = class.attribute("ConstantValue", &u2s(&[500]));
    class.field(0x0019, "X", "I", &[constant]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index: 500, .. })
    ));
}

#[test]
fn constant_value_of_wrong_kind() {
    let mut class = ClassBuilder::new("demo/Bad");
    let text = class.pool.utf8("not a constant");
    let constant = class.attribute("ConstantValue", &u2s(&[text]));
    class.field(0x0019, "X", "I", &[constant]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == text
    ));
}

#[test]
fn attribute_with_unread_bytes() {
    let mut class = ClassBuilder::new("demo/Bad");
    let source = class.pool.utf8("Bad.java");
    let mut body = u2s(&[source]);
    body.push(0);
    let attribute = class.attribute("SourceFile", &body);
    class.class_attribute(attribute);

    match disassemble(&class.build(), false) {
        Err(Error::MalformedAttribute { attribute, .. }) => assert_eq!(attribute, "SourceFile"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn attribute_body_too_short() {
    let mut class = ClassBuilder::new("demo/Bad");
    let attribute = class.attribute("InnerClasses", &u2s(&[1, 2]));
    class.class_attribute(attribute);

    match disassemble(&class.build(), false) {
        Err(Error::MalformedAttribute { attribute, .. }) => assert_eq!(attribute, "InnerClasses"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_code_array() {
    let mut class = ClassBuilder::new("demo/Bad");
    let mut body = u2s(&[1, 1]);
    body.extend_from_slice(&0_u32.to_be_bytes());
    body.extend_from_slice(&u2s(&[0, 0]));
    let code = class.attribute("Code", &body);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);

    match disassemble(&class.build(), false) {
        Err(Error::MalformedAttribute { attribute, .. }) => assert_eq!(attribute, "Code"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn undefined_opcode() {
    let bytes = method_with_code(&[0x00, 0xCB, 0xB1]);

    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::MalformedCode { offset: 1, .. })
    ));
}

#[test]
fn branch_into_an_instruction() {
    // 0: goto 1 (the middle of the goto itself)
    let bytes = method_with_code(&[0xA7, 0x00, 0x01, 0xB1]);

    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::MalformedCode { offset: 0, .. })
    ));
}

#[test]
fn instruction_past_code_end() {
    // sipush with a single operand byte
    let bytes = method_with_code(&[0x00, 0x11, 0x01]);

    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::MalformedCode { offset: 1, .. })
    ));
}

#[test]
fn wide_before_plain_opcode() {
    let bytes = method_with_code(&[0xC4, 0x00, 0xB1]);

    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::MalformedCode { offset: 0, .. })
    ));
}

#[test]
fn reserved_stack_map_frame() {
    let mut class = ClassBuilder::new("demo/Bad");
    let frames = class.attribute("StackMapTable", &[0, 1, 200]);
    let code = class.code(1, 1, &[0xB1], &[], &[frames]);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);

    match disassemble(&class.build(), false) {
        Err(Error::MalformedAttribute { attribute, .. }) => assert_eq!(attribute, "StackMapTable"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn deeply_nested_annotation() {
    let mut class = ClassBuilder::new("demo/Bad");
    let annotation_type = class.pool.utf8("Ldemo/Nested;");
    let value = class.pool.utf8("value");

    let mut nested = Vec::new();
    for _ in 0..100 {
        nested.extend_from_slice(&u2s(&[annotation_type, 1, value]));
        nested.push(b'@');
    }
    nested.extend_from_slice(&u2s(&[annotation_type, 0]));

    let mut body = u2s(&[1]);
    body.extend_from_slice(&nested);
    let annotations = class.attribute("RuntimeVisibleAnnotations", &body);
    class.class_attribute(annotations);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::RecursionLimit(_))
    ));
}

#[test]
fn dynamic_constant_without_bootstrap_table() {
    let mut class = ClassBuilder::new("demo/Bad");
    let condy = class.pool.dynamic(3, "value", "I");
    let [high, low] = condy.to_be_bytes();
    let code = class.code(1, 0, &[0x13, high, low, 0xAC], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()I", &[code]);
    let bytes = class.build();

    // the model parses, only resolving the operand fails
    assert!(ClassFile::parse(&bytes).is_ok());
    assert!(matches!(
        disassemble(&bytes, false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == condy
    ));
}

#[test]
fn unusable_long_slot() {
    let mut class = ClassBuilder::new("demo/Bad");
    let long = class.pool.long(1);
    // ldc2_w of the second slot of the Long
    let [high, low] = (long + 1).to_be_bytes();
    let code = class.code(2, 0, &[0x14, high, low, 0xAD], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()J", &[code]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { .. })
    ));
}

#[test]
fn new_of_a_utf8_entry() {
    let mut class = ClassBuilder::new("demo/Bad");
    let text = class.pool.utf8("demo/Thing");
    let [high, low] = text.to_be_bytes();
    let code = class.code(2, 0, &[0xBB, high, low, 0x57, 0xB1], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == text
    ));
}

#[test]
fn invokevirtual_of_a_field_reference() {
    let mut class = ClassBuilder::new("demo/Bad");
    let field = class.pool.field_ref("demo/Bad", "x", "I");
    let [high, low] = field.to_be_bytes();
    let code = class.code(1, 1, &[0x2A, 0xB6, high, low, 0xB1], &[], &[]);
    class.method(0x0001, "f", "()V", &[code]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == field
    ));
}

#[test]
fn invokedynamic_of_a_method_reference() {
    let mut class = ClassBuilder::new("demo/Bad");
    let method = class.pool.method_ref("demo/Bad", "g", "()V");
    let [high, low] = method.to_be_bytes();
    let code = class.code(1, 0, &[0xBA, high, low, 0, 0, 0xB1], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == method
    ));
}

#[test]
fn ldc_of_a_long() {
    let mut class = ClassBuilder::new("demo/Bad");
    let long = class.pool.long(7);
    let [high, low] = long.to_be_bytes();
    // ldc_w needs a single-slot constant, ldc2_w would be correct
    let code = class.code(2, 0, &[0x13, high, low, 0xAD], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()J", &[code]);

    assert!(matches!(
        disassemble(&class.build(), false),
        Err(Error::InvalidConstantPoolIndex { index, .. }) if index == long
    ));
}

#[test]
fn interface_reference_accepted_by_invokestatic() {
    let mut class = ClassBuilder::new("demo/Ok");
    let method = class.pool.interface_method_ref("demo/Api", "create", "()V");
    let [high, low] = method.to_be_bytes();
    let code = class.code(1, 0, &[0xB8, high, low, 0xB1], &[], &[]);
    class.method(PUBLIC_STATIC, "f", "()V", &[code]);

    let text = disassemble(&class.build(), false).unwrap();
    assert!(text.contains("0: invokestatic demo/Api.create:()V\n"));
}
