//! Text rendering of a parsed class.
//!
//! The printer walks the model once, in declaration order, and writes into a `String`. It
//! has no state besides the output, so the same class and configuration always produce the
//! same text. Constant pool operands are resolved here; a resolution failure aborts the
//! listing instead of printing a placeholder.

use std::fmt::{self, Write};

use crate::{
    classfile::{
        attributes::{
            code::CodeAttribute, module::ModuleAttribute, stackmap::StackMapFrame, Attribute,
            LocalVariable,
        },
        constantpool::{quote, ConstantPool, ConstantPoolEntry},
        descriptor::{java_name, FieldType, MethodDescriptor},
        flags::{describe, ClassAccessFlags, ModuleFlags},
        member::{FieldInfo, MethodInfo},
        ClassFile,
    },
    disassembler::{array_type_name, constant_operand, Instruction, Operand},
    render::config::DisassemblyConfig,
    Result,
};

/// Spaces per nesting level.
const INDENT: usize = 2;

/// Bytes per line in hex dumps of opaque attributes.
const HEX_LINE: usize = 16;

/// Renders a [`ClassFile`] as a disassembly listing.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::{ClassFile, DisassemblyConfig, Printer};
/// use std::path::Path;
///
/// let class = ClassFile::from_file(Path::new("Main.class"))?;
/// let config = DisassemblyConfig::verbose();
/// let text = Printer::new(&class, &config).print()?;
/// println!("{text}");
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct Printer<'a> {
    class: &'a ClassFile,
    config: &'a DisassemblyConfig,
    digest: Option<String>,
    out: String,
}

impl<'a> Printer<'a> {
    /// Create a printer for `class`.
    #[must_use]
    pub fn new(class: &'a ClassFile, config: &'a DisassemblyConfig) -> Self {
        Printer {
            class,
            config,
            digest: None,
            out: String::new(),
        }
    }

    /// Print `digest` as the first line of the listing.
    #[must_use]
    pub fn with_digest(mut self, digest: String) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Produce the listing.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidConstantPoolIndex`] if an instruction operand or
    /// bootstrap method does not resolve, [`crate::Error::Malformed`] for an unparsable member
    /// descriptor and [`crate::Error::Format`] if writing fails.
    pub fn print(mut self) -> Result<String> {
        let class = self.class;

        self.header()?;
        if self.config.constant_pool {
            self.constant_pool()?;
        }
        self.declaration()?;

        for field in &class.fields {
            self.line(0, "")?;
            self.field(field)?;
        }

        for method in &class.methods {
            self.line(0, "")?;
            self.method(method)?;
        }

        if !class.attributes.is_empty() {
            self.line(0, "")?;
            self.attributes(&class.attributes, INDENT)?;
        }

        self.line(0, "}")?;
        Ok(self.out)
    }

    fn line(&mut self, indent: usize, text: impl fmt::Display) -> Result<()> {
        writeln!(self.out, "{:indent$}{text}", "")?;
        Ok(())
    }

    fn pool(&self) -> &'a ConstantPool {
        let class: &'a ClassFile = self.class;
        &class.constant_pool
    }

    fn header(&mut self) -> Result<()> {
        let class = self.class;

        if let Some(digest) = self.digest.take() {
            self.line(0, format_args!("md5: {digest}"))?;
        }

        let preview = if class.is_preview() { ", preview" } else { "" };
        self.line(
            0,
            format_args!(
                "version: {}.{} ({}{preview})",
                class.major_version,
                class.minor_version,
                class.java_version()
            ),
        )?;
        self.line(0, format_args!("access: {}", describe(&class.access_flags)))?;
        self.line(0, format_args!("this: {}", class.this_class))?;
        self.line(
            0,
            format_args!("super: {}", class.super_class.as_deref().unwrap_or("none")),
        )?;
        if !class.interfaces.is_empty() {
            self.line(0, format_args!("interfaces: {}", class.interfaces.join(", ")))?;
        }
        self.line(0, "")
    }

    fn constant_pool(&mut self) -> Result<()> {
        let pool = self.pool();

        self.line(0, format_args!("constant pool: {} slots", pool.len()))?;
        for (index, entry) in pool.iter() {
            let slot = format!("#{index}");
            let references = entry.references();
            let resolved = match entry {
                ConstantPoolEntry::Utf8(value) => quote(value),
                _ => pool.resolve(index)?,
            };
            if references.is_empty() {
                self.line(INDENT, format_args!("{slot:>6} = {:<18} {resolved}", entry.kind()))?;
            } else {
                self.line(
                    INDENT,
                    format_args!("{slot:>6} = {:<18} {references:<14} // {resolved}", entry.kind()),
                )?;
            }
        }
        self.line(0, "")
    }

    fn declaration(&mut self) -> Result<()> {
        let class = self.class;
        let flags = class.access_flags;

        if class.is_module() {
            let module = class.attributes.iter().find_map(|attribute| match attribute {
                Attribute::Module(module) => Some(module),
                _ => None,
            });
            let name = module.map_or("module-info", |module| module.name.as_str());
            let open = module.is_some_and(|module| module.flags.contains(ModuleFlags::OPEN));
            let prefix = if open { "open " } else { "" };
            return self.line(0, format_args!("{prefix}module {name} {{"));
        }

        let (kind, implicit_super, implicit_interface) =
            if flags.contains(ClassAccessFlags::ANNOTATION) {
                ("@interface", None, Some("java/lang/annotation/Annotation"))
            } else if flags.contains(ClassAccessFlags::INTERFACE) {
                ("interface", None, None)
            } else if flags.contains(ClassAccessFlags::ENUM) {
                ("enum", Some("java/lang/Enum"), None)
            } else if class.is_record() {
                ("record", Some("java/lang/Record"), None)
            } else {
                ("class", Some("java/lang/Object"), None)
            };

        let mut words: Vec<String> = flags
            .modifiers()
            .into_iter()
            // enums and records are implicitly final
            .filter(|modifier| !(*modifier == "final" && matches!(kind, "enum" | "record")))
            .map(ToString::to_string)
            .collect();
        if class.is_sealed() {
            words.push("sealed".to_string());
        }
        words.push(kind.to_string());
        words.push(java_name(&class.this_class));

        let interfaces: Vec<String> = class
            .interfaces
            .iter()
            .filter(|interface| Some(interface.as_str()) != implicit_interface)
            .map(|interface| java_name(interface))
            .collect();

        if let Some(implicit_super) = implicit_super {
            if let Some(super_class) = &class.super_class {
                if super_class != implicit_super {
                    words.push(format!("extends {}", java_name(super_class)));
                }
            }
            if !interfaces.is_empty() {
                words.push(format!("implements {}", interfaces.join(", ")));
            }
        } else if !interfaces.is_empty() {
            words.push(format!("extends {}", interfaces.join(", ")));
        }

        self.line(0, format_args!("{} {{", words.join(" ")))
    }

    fn field(&mut self, field: &FieldInfo) -> Result<()> {
        let field_type = FieldType::parse(&field.descriptor)?;
        let mut words: Vec<String> = field
            .access_flags
            .modifiers()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        words.push(field_type.to_string());
        words.push(field.name.clone());

        self.line(INDENT, format_args!("field: {}", words.join(" ")))?;
        self.line(2 * INDENT, format_args!("descriptor: {}", field.descriptor))?;
        if self.config.verbose {
            self.line(
                2 * INDENT,
                format_args!("flags: {}", describe(&field.access_flags)),
            )?;
        }
        self.attributes(&field.attributes, 2 * INDENT)
    }

    fn method(&mut self, method: &MethodInfo) -> Result<()> {
        let descriptor = MethodDescriptor::parse(&method.descriptor)?;
        let mut words: Vec<String> = method
            .access_flags
            .modifiers()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        match method.name.as_str() {
            "<clinit>" => words = vec!["static {}".to_string()],
            "<init>" => words.push(format!(
                "{}({})",
                java_name(&self.class.this_class),
                descriptor.parameter_list()
            )),
            name => {
                words.push(descriptor.return_name());
                words.push(format!("{name}({})", descriptor.parameter_list()));
            }
        }

        self.line(INDENT, format_args!("method: {}", words.join(" ")))?;
        self.line(2 * INDENT, format_args!("descriptor: {}", method.descriptor))?;
        if self.config.verbose {
            self.line(
                2 * INDENT,
                format_args!("flags: {}", describe(&method.access_flags)),
            )?;
        }
        self.attributes(&method.attributes, 2 * INDENT)
    }

    fn attributes(&mut self, attributes: &[Attribute], indent: usize) -> Result<()> {
        for attribute in attributes {
            self.attribute(attribute, indent)?;
        }
        Ok(())
    }

    fn attribute(&mut self, attribute: &Attribute, indent: usize) -> Result<()> {
        let name = attribute.name();
        let inner = indent + INDENT;

        match attribute {
            Attribute::ConstantValue(index) => {
                let value = self.pool().resolve(*index)?;
                self.line(indent, format_args!("{name}: {value}"))?;
            }
            Attribute::Code(code) => self.code(code, indent)?,
            Attribute::StackMapTable(frames) => self.stack_map(frames, indent)?,
            Attribute::Exceptions(classes)
            | Attribute::NestMembers(classes)
            | Attribute::ModulePackages(classes) => {
                self.line(indent, format_args!("{name}: {}", classes.join(", ")))?;
            }
            Attribute::PermittedSubclasses(classes) => {
                self.line(indent, format_args!("{name}:"))?;
                for class in classes {
                    self.line(inner, class)?;
                }
            }
            Attribute::InnerClasses(classes) => {
                self.line(indent, format_args!("{name}:"))?;
                for class in classes {
                    self.line(
                        inner,
                        format_args!(
                            "{} outer={} name={} flags={}",
                            class.inner,
                            class.outer.as_deref().unwrap_or("none"),
                            class.name.as_deref().unwrap_or("none"),
                            describe(&class.flags)
                        ),
                    )?;
                }
            }
            Attribute::EnclosingMethod { class, method } => match method {
                Some((method, descriptor)) => {
                    self.line(indent, format_args!("{name}: {class}.{method}:{descriptor}"))?;
                }
                None => self.line(indent, format_args!("{name}: {class}"))?,
            },
            Attribute::Synthetic | Attribute::Deprecated => {
                self.line(indent, format_args!("{name}: true"))?;
            }
            Attribute::Signature(value)
            | Attribute::SourceFile(value)
            | Attribute::ModuleMainClass(value)
            | Attribute::NestHost(value) => {
                self.line(indent, format_args!("{name}: {value}"))?;
            }
            Attribute::SourceDebugExtension(value) => {
                self.line(indent, format_args!("{name}:"))?;
                for text in value.lines() {
                    self.line(inner, text)?;
                }
            }
            Attribute::LineNumberTable(lines) => {
                self.line(indent, format_args!("{name}:"))?;
                for line in lines {
                    self.line(
                        inner,
                        format_args!("line {}: {}", line.line_number, line.start_pc),
                    )?;
                }
            }
            Attribute::LocalVariableTable(variables)
            | Attribute::LocalVariableTypeTable(variables) => {
                self.local_variables(name, variables, indent)?;
            }
            Attribute::RuntimeVisibleAnnotations(annotations)
            | Attribute::RuntimeInvisibleAnnotations(annotations) => {
                self.line(indent, format_args!("{name}:"))?;
                for annotation in annotations {
                    self.line(inner, annotation)?;
                }
            }
            Attribute::RuntimeVisibleParameterAnnotations(parameters)
            | Attribute::RuntimeInvisibleParameterAnnotations(parameters) => {
                self.line(indent, format_args!("{name}:"))?;
                for (position, annotations) in parameters.iter().enumerate() {
                    self.line(inner, format_args!("parameter {position}:"))?;
                    for annotation in annotations {
                        self.line(inner + INDENT, annotation)?;
                    }
                }
            }
            Attribute::RuntimeVisibleTypeAnnotations(annotations)
            | Attribute::RuntimeInvisibleTypeAnnotations(annotations) => {
                self.line(indent, format_args!("{name}:"))?;
                for annotation in annotations {
                    self.line(inner, annotation)?;
                }
            }
            Attribute::AnnotationDefault(value) => {
                self.line(indent, format_args!("{name}: {value}"))?;
            }
            Attribute::BootstrapMethods(methods) => {
                let pool = self.pool();
                self.line(indent, format_args!("{name}:"))?;
                for (position, method) in methods.iter().enumerate() {
                    let handle = pool.resolve(method.method_ref)?;
                    self.line(inner, format_args!("#{position} {handle}"))?;
                    let arguments = method
                        .arguments
                        .iter()
                        .map(|argument| pool.resolve(*argument))
                        .collect::<Result<Vec<_>>>()?;
                    self.line(
                        inner + INDENT,
                        format_args!("arguments: [{}]", arguments.join(", ")),
                    )?;
                }
            }
            Attribute::MethodParameters(parameters) => {
                self.line(indent, format_args!("{name}:"))?;
                for parameter in parameters {
                    self.line(
                        inner,
                        format_args!(
                            "{} {}",
                            parameter.name.as_deref().unwrap_or("<no name>"),
                            describe(&parameter.flags)
                        ),
                    )?;
                }
            }
            Attribute::Module(module) => self.module(module, indent)?,
            Attribute::Record(components) => {
                self.line(indent, format_args!("{name}:"))?;
                for component in components {
                    let component_type = FieldType::parse(&component.descriptor)?;
                    self.line(
                        inner,
                        format_args!("component: {component_type} {}", component.name),
                    )?;
                    self.line(
                        inner + INDENT,
                        format_args!("descriptor: {}", component.descriptor),
                    )?;
                    self.attributes(&component.attributes, inner + INDENT)?;
                }
            }
            Attribute::Opaque { data, .. } => {
                self.line(indent, format_args!("{name}: {} bytes", data.len()))?;
                if self.config.verbose {
                    for chunk in data.chunks(HEX_LINE) {
                        let hex: Vec<String> =
                            chunk.iter().map(|byte| format!("{byte:02x}")).collect();
                        self.line(inner, hex.join(" "))?;
                    }
                }
            }
        }

        Ok(())
    }

    fn code(&mut self, code: &CodeAttribute, indent: usize) -> Result<()> {
        let inner = indent + INDENT;

        self.line(indent, "Code:")?;
        if self.config.verbose {
            self.line(
                inner,
                format_args!(
                    "stack={}, locals={}, code_length={}",
                    code.max_stack, code.max_locals, code.code_length
                ),
            )?;
        } else {
            self.line(
                inner,
                format_args!("stack={}, locals={}", code.max_stack, code.max_locals),
            )?;
        }

        for instruction in &code.instructions {
            self.instruction(instruction, inner)?;
        }

        if !code.exception_table.is_empty() {
            self.line(inner, "Exception table:")?;
            self.line(inner + INDENT, "from to target type")?;
            for handler in &code.exception_table {
                self.line(
                    inner + INDENT,
                    format_args!(
                        "{} {} {} {}",
                        handler.start_pc,
                        handler.end_pc,
                        handler.handler_pc,
                        handler.catch_type.as_deref().unwrap_or("any")
                    ),
                )?;
            }
        }

        self.attributes(&code.attributes, inner)
    }

    fn instruction(&mut self, instruction: &Instruction, indent: usize) -> Result<()> {
        let pool = self.pool();
        let prefix = if instruction.wide { "wide " } else { "" };
        let mut text = format!("{}: {prefix}{}", instruction.offset, instruction.mnemonic);

        let mut operands = Vec::with_capacity(instruction.operands.len());
        let mut table = None;
        for operand in &instruction.operands {
            match operand {
                Operand::Constant(index) => {
                    if let Some(kind) = constant_operand(instruction.opcode) {
                        pool.operand(*index, kind)?;
                    }
                    operands.push(pool.resolve(*index)?);
                }
                Operand::Local(slot) => operands.push(slot.to_string()),
                Operand::Immediate(value) => operands.push(value.to_string()),
                Operand::ArrayType(code) => operands.push(
                    array_type_name(*code).map_or_else(|| code.to_string(), ToString::to_string),
                ),
                Operand::Branch(target) => operands.push(target.to_string()),
                Operand::Switch { default, cases } => table = Some((default, cases)),
            }
        }

        if !operands.is_empty() {
            text.push(' ');
            text.push_str(&operands.join(", "));
        }
        self.line(indent, text)?;

        if let Some((default, cases)) = table {
            for (value, target) in cases {
                self.line(indent + 2 * INDENT, format_args!("{value}: {target}"))?;
            }
            self.line(indent + 2 * INDENT, format_args!("default: {default}"))?;
        }

        Ok(())
    }

    fn stack_map(&mut self, frames: &[StackMapFrame], indent: usize) -> Result<()> {
        self.line(indent, format_args!("StackMapTable: {} frames", frames.len()))?;
        if !self.config.show_frames() {
            return Ok(());
        }

        // the first frame is at its delta, every later one at previous + delta + 1
        let mut offset: Option<u32> = None;
        for frame in frames {
            let delta = u32::from(frame.offset_delta());
            let current = offset.map_or(delta, |previous| previous.saturating_add(delta + 1));
            offset = Some(current);
            self.line(indent + INDENT, format_args!("offset {current}: {frame}"))?;
        }
        Ok(())
    }

    fn local_variables(
        &mut self,
        name: &str,
        variables: &[LocalVariable],
        indent: usize,
    ) -> Result<()> {
        let inner = indent + INDENT;

        self.line(indent, format_args!("{name}:"))?;
        self.line(inner, "start length slot name descriptor")?;
        for variable in variables {
            self.line(
                inner,
                format_args!(
                    "{} {} {} {} {}",
                    variable.start_pc,
                    variable.length,
                    variable.index,
                    variable.name,
                    variable.descriptor
                ),
            )?;
        }
        Ok(())
    }

    fn module(&mut self, module: &ModuleAttribute, indent: usize) -> Result<()> {
        let inner = indent + INDENT;

        self.line(indent, "Module:")?;
        self.line(inner, format_args!("name: {}", module.name))?;
        self.line(inner, format_args!("flags: {}", describe(&module.flags)))?;
        self.line(
            inner,
            format_args!("version: {}", module.version.as_deref().unwrap_or("none")),
        )?;

        for requires in &module.requires {
            let version = requires
                .version
                .as_deref()
                .map(|version| format!(" version {version}"))
                .unwrap_or_default();
            self.line(
                inner,
                format_args!(
                    "requires {} {}{version}",
                    requires.module,
                    describe(&requires.flags)
                ),
            )?;
        }

        for (keyword, directives) in [("exports", &module.exports), ("opens", &module.opens)] {
            for directive in directives {
                let targets = if directive.to.is_empty() {
                    String::new()
                } else {
                    format!(" to {}", directive.to.join(", "))
                };
                self.line(
                    inner,
                    format_args!(
                        "{keyword} {} {}{targets}",
                        directive.package,
                        describe(&directive.flags)
                    ),
                )?;
            }
        }

        for service in &module.uses {
            self.line(inner, format_args!("uses {service}"))?;
        }

        for provides in &module.provides {
            self.line(
                inner,
                format_args!("provides {} with {}", provides.service, provides.with.join(", ")),
            )?;
        }

        Ok(())
    }
}
