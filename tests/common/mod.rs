//! Fixtures for the integration tests, built with the same byte-level builder the unit tests
//! use.
#![allow(dead_code)]

#[path = "../../src/test/builder.rs"]
mod builder;

pub use builder::*;

/// `ACC_PUBLIC | ACC_STATIC`
pub const PUBLIC_STATIC: u16 = 0x0009;

/// A class with a constructor, a `main` method, source file and line numbers.
pub fn hello_world() -> Vec<u8> {
    let mut class = ClassBuilder::new("demo/Hello");
    let object_init = class.pool.method_ref("java/lang/Object", "<init>", "()V");
    let out = class
        .pool
        .field_ref("java/lang/System", "out", "Ljava/io/PrintStream;");
    let greeting = class.pool.string("Hello, World!");
    let println = class
        .pool
        .method_ref("java/io/PrintStream", "println", "(Ljava/lang/String;)V");

    let [init_high, init_low] = object_init.to_be_bytes();
    let constructor = class.code(1, 1, &[0x2A, 0xB7, init_high, init_low, 0xB1], &[], &[]);

    let lines = class.attribute("LineNumberTable", &u2s(&[2, 0, 3, 8, 4]));
    let [out_high, out_low] = out.to_be_bytes();
    let [println_high, println_low] = println.to_be_bytes();
    let main = class.code(
        2,
        1,
        &[
            0xB2,
            out_high,
            out_low,
            0x12,
            greeting as u8,
            0xB6,
            println_high,
            println_low,
            0xB1,
        ],
        &[],
        &[lines],
    );

    let source = class.pool.utf8("Hello.java");
    let source_file = class.attribute("SourceFile", &u2s(&[source]));

    class
        .method(0x0001, "<init>", "()V", &[constructor])
        .method(PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", &[main])
        .class_attribute(source_file);
    class.build()
}

/// An interface extending a single interface, with no fields.
pub fn single_interface() -> Vec<u8> {
    let mut class = ClassBuilder::new("shapes/Shape");
    class.access_flags = 0x0601;
    class.interface("java/lang/Comparable");
    class.method(0x0401, "area", "()D", &[]);
    class.build()
}

/// A static method that concatenates through `invokedynamic` and `StringConcatFactory`.
pub fn invoke_dynamic() -> Vec<u8> {
    let mut class = ClassBuilder::new("demo/Concat");
    let factory = class.pool.method_ref(
        "java/lang/invoke/StringConcatFactory",
        "makeConcatWithConstants",
        "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/invoke/CallSite;",
    );
    let handle = class.pool.method_handle(6, factory);
    let recipe = class.pool.string("Hello \u{1}!");
    let call_site = class.pool.invoke_dynamic(
        0,
        "makeConcatWithConstants",
        "(Ljava/lang/String;)Ljava/lang/String;",
    );

    let [site_high, site_low] = call_site.to_be_bytes();
    let code = class.code(1, 1, &[0x2A, 0xBA, site_high, site_low, 0, 0, 0xB0], &[], &[]);
    class.method(
        PUBLIC_STATIC,
        "greet",
        "(Ljava/lang/String;)Ljava/lang/String;",
        &[code],
    );

    let bootstrap = class.attribute("BootstrapMethods", &u2s(&[1, handle, 1, recipe]));
    class.class_attribute(bootstrap);
    class.build()
}

/// `record Point(int x, long y)` with its canonical constructor.
pub fn record() -> Vec<u8> {
    let mut class = ClassBuilder::new("geo/Point");
    class.access_flags = 0x0031;
    class.super_class(Some("java/lang/Record"));

    let record_init = class.pool.method_ref("java/lang/Record", "<init>", "()V");
    let x_ref = class.pool.field_ref("geo/Point", "x", "I");
    let y_ref = class.pool.field_ref("geo/Point", "y", "J");

    let [init_high, init_low] = record_init.to_be_bytes();
    let [x_high, x_low] = x_ref.to_be_bytes();
    let [y_high, y_low] = y_ref.to_be_bytes();
    let code = class.code(
        3,
        4,
        &[
            0x2A, 0xB7, init_high, init_low, // super()
            0x2A, 0x1B, 0xB5, x_high, x_low, // this.x = x
            0x2A, 0x20, 0xB5, y_high, y_low, // this.y = y
            0xB1,
        ],
        &[],
        &[],
    );

    let x = class.pool.utf8("x");
    let y = class.pool.utf8("y");
    let int = class.pool.utf8("I");
    let long = class.pool.utf8("J");
    let components = class.attribute("Record", &u2s(&[2, x, int, 0, y, long, 0]));

    class
        .field(0x0012, "x", "I", &[])
        .field(0x0012, "y", "J", &[])
        .method(0x0001, "<init>", "(IJ)V", &[code])
        .class_attribute(components);
    class.build()
}

/// A sealed abstract class with three permitted subclasses.
pub fn sealed() -> Vec<u8> {
    let mut class = ClassBuilder::new("shapes/Figure");
    class.access_flags = 0x0421;

    let circle = class.pool.class("shapes/Circle");
    let square = class.pool.class("shapes/Square");
    let triangle = class.pool.class("shapes/Triangle");
    let permitted = class.attribute("PermittedSubclasses", &u2s(&[3, circle, square, triangle]));
    class.class_attribute(permitted);
    class.build()
}

/// The innermost of three nested classes, with one InnerClasses entry per level.
pub fn nested_inner() -> Vec<u8> {
    let mut class = ClassBuilder::new("a/Outer$Middle$Inner");
    class.access_flags = 0x0020;

    let outer = class.pool.class("a/Outer");
    let middle = class.pool.class("a/Outer$Middle");
    let inner = class.pool.class("a/Outer$Middle$Inner");
    let middle_name = class.pool.utf8("Middle");
    let inner_name = class.pool.utf8("Inner");
    let outer_name = class.pool.utf8("Outer");

    // a/Outer is listed with no outer class, then each level refers to the previous one
    let entries = u2s(&[
        3, outer, 0, outer_name, 0x0001, middle, outer, middle_name, 0x0009, inner, middle,
        inner_name, 0x0008,
    ]);
    let inner_classes = class.attribute("InnerClasses", &entries);
    let nest_host = class.attribute("NestHost", &u2s(&[outer]));
    class.class_attribute(inner_classes).class_attribute(nest_host);
    class.build()
}

/// A method with a `tableswitch` at offset 1 and a `lookupswitch` at offset 29, both odd.
pub fn switches() -> Vec<u8> {
    let mut code = vec![0x1A, 0xAA, 0, 0];
    // default -> 28, cases 0..=2 -> 56, 58, 28
    for value in [27_i32, 0, 2, 55, 57, 27] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    code.extend_from_slice(&[0x1A, 0xAB, 0, 0]);
    // default -> 60, -5 -> 56, 100 -> 58
    for value in [31_i32, 2, -5, 27, 100, 29] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    code.extend_from_slice(&[0x04, 0xAC, 0x05, 0xAC, 0x02, 0xAC]);

    let mut class = ClassBuilder::new("demo/Switch");
    let code = class.code(1, 1, &code, &[], &[]);
    class.method(PUBLIC_STATIC, "classify", "(I)I", &[code]);
    class.build()
}

/// `wide` loads and increments plus backward branches.
pub fn wide_locals() -> Vec<u8> {
    let mut class = ClassBuilder::new("demo/Wide");
    let code = class.code(
        2,
        400,
        &[
            0xC4, 0x15, 0x01, 0x2C, // 0: wide iload 300
            0xC4, 0x84, 0x01, 0x2C, 0xFC, 0x18, // 4: wide iinc 300, -1000
            0x9A, 0xFF, 0xF6, // 10: ifne 0
            0xC8, 0xFF, 0xFF, 0xFF, 0xF3, // 13: goto_w 0
        ],
        &[],
        &[],
    );
    class.method(PUBLIC_STATIC, "spin", "(I)V", &[code]);
    class.build()
}

/// `module-info` of an open module.
pub fn module_info() -> Vec<u8> {
    let mut class = ClassBuilder::new("module-info");
    class.access_flags = 0x8000;
    class.super_class(None);

    let app = class.pool.module("com.example.app");
    let base = class.pool.module("java.base");
    let api = class.pool.package("com/example/api");
    let service = class.pool.class("com/example/spi/Plugin");
    let implementation = class.pool.class("com/example/impl/DefaultPlugin");

    let body = u2s(&[
        app, 0x0020, 0, // open module
        1, base, 0x8000, 0, // requires java.base
        1, api, 0, 0, // exports com.example.api
        0, // opens
        1, service, // uses
        1, service, 1, implementation, // provides
    ]);
    let module = class.attribute("Module", &body);
    let packages = class.attribute("ModulePackages", &u2s(&[1, api]));
    class.class_attribute(module).class_attribute(packages);
    class.build()
}

/// Annotations, constants, exception handlers, local variables, stack map frames, a dynamic
/// constant and an unknown attribute.
pub fn kitchen_sink() -> Vec<u8> {
    let mut class = ClassBuilder::new("demo/Sink");

    // @java.lang.Deprecated on the class
    let deprecated = class.pool.utf8("Ljava/lang/Deprecated;");
    let annotations = class.attribute("RuntimeVisibleAnnotations", &u2s(&[1, deprecated, 0]));
    let signature_text = class.pool.utf8("<T:Ljava/lang/Object;>Ljava/lang/Object;");
    let signature = class.attribute("Signature", &u2s(&[signature_text]));

    // public static final long LIMIT = 10L
    let limit = class.pool.long(10);
    let constant = class.attribute("ConstantValue", &u2s(&[limit]));

    // condy: ldc of a dynamic constant produced by ConstantBootstraps.nullConstant
    let bootstraps = class.pool.method_ref(
        "java/lang/invoke/ConstantBootstraps",
        "nullConstant",
        "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/Class;)Ljava/lang/Object;",
    );
    let handle = class.pool.method_handle(6, bootstraps);
    let condy = class.pool.dynamic(0, "nothing", "Ljava/lang/Object;");
    let bootstrap = class.attribute("BootstrapMethods", &u2s(&[1, handle, 0]));

    // try { ldc_w condy; areturn } catch (IOException e) { aconst_null; areturn }
    let io_exception = class.pool.class("java/io/IOException");
    let this_name = class.pool.utf8("this");
    let this_type = class.pool.utf8("Ldemo/Sink;");
    let locals = class.attribute(
        "LocalVariableTable",
        &u2s(&[1, 0, 7, this_name, this_type, 0]),
    );
    let [io_high, io_low] = io_exception.to_be_bytes();
    // same_locals_1_stack_item_frame at offset 4 with an IOException on the stack
    let frames = class.attribute("StackMapTable", &[0, 1, 68, 7, io_high, io_low]);
    let [condy_high, condy_low] = condy.to_be_bytes();
    let code = class.code(
        1,
        1,
        &[0x13, condy_high, condy_low, 0xB0, 0x4B, 0x01, 0xB0],
        &[[0, 4, 4, io_exception]],
        &[locals, frames],
    );
    let exceptions = class.attribute("Exceptions", &u2s(&[1, io_exception]));

    let vendor = class.attribute("VendorData", &[0xCA, 0xFE, 0x00, 0x01]);

    class
        .field(0x0019, "LIMIT", "J", &[constant])
        .method(0x0001, "load", "()Ljava/lang/Object;", &[code, exceptions])
        .class_attribute(annotations)
        .class_attribute(signature)
        .class_attribute(bootstrap)
        .class_attribute(vendor);
    class.build()
}

/// Every fixture with a name, for property tests.
pub fn all() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("hello_world", hello_world()),
        ("single_interface", single_interface()),
        ("invoke_dynamic", invoke_dynamic()),
        ("record", record()),
        ("sealed", sealed()),
        ("nested_inner", nested_inner()),
        ("switches", switches()),
        ("wide_locals", wide_locals()),
        ("module_info", module_info()),
        ("kitchen_sink", kitchen_sink()),
    ]
}
