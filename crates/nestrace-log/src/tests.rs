use super::*;

const JMP: &str =
    "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7";
const JMP_WITH_PPU: &str =
    "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7";

fn line(text: &str) -> ParsedLine {
    ParsedLine::parse(text)
}

#[test]
fn test_parse_full_line() {
    let record = TraceRecord::parse(JMP).unwrap();

    assert_eq!(record.program_counter, "C000");
    assert_eq!(record.instruction_bytes, "4C F5 C5");
    assert_eq!(record.disassembly, "JMP $C5F5");
    assert_eq!(record.accumulator, Field::Parsed(Hex8(0x00)));
    assert_eq!(record.x_register, Field::Parsed(Hex8(0x00)));
    assert_eq!(record.y_register, Field::Parsed(Hex8(0x00)));
    assert_eq!(record.status_flags, Field::Parsed(Hex8(0x24)));
    assert_eq!(record.stack_pointer, Field::Parsed(Hex8(0xFD)));
    assert_eq!(record.cycle_count, Field::Parsed(Cycles(7)));
    assert_eq!(record.raw_text, JMP);
}

#[test]
fn test_parse_ignores_ppu_column() {
    let plain = TraceRecord::parse(JMP).unwrap();
    let with_ppu = TraceRecord::parse(JMP_WITH_PPU).unwrap();

    assert_eq!(with_ppu.cycle_count, Field::Parsed(Cycles(7)));
    assert_eq!(with_ppu.stack_pointer, plain.stack_pointer);
    assert!(compare(&line(JMP), &line(JMP_WITH_PPU)).matches());
}

#[test]
fn test_parse_single_byte_instruction() {
    let record = TraceRecord::parse(
        "C72F  EA        NOP                             A:00 X:00 Y:00 P:26 SP:FB CYC:35",
    )
    .unwrap();

    assert_eq!(record.instruction_bytes, "EA");
    assert_eq!(record.disassembly, "NOP");
    assert_eq!(record.status_flags, Field::Parsed(Hex8(0x26)));
}

#[test]
fn test_parse_disassembly_containing_a() {
    // Mnemonics and operands may contain the letter A; only the `A:` marker ends the column.
    let record = TraceRecord::parse(
        "C5FE  AD 00 02  LDA $0200 = 00                  A:AA X:97 Y:4E P:E5 SP:F9 CYC:301",
    )
    .unwrap();

    assert_eq!(record.disassembly, "LDA $0200 = 00");
    assert_eq!(record.accumulator, Field::Parsed(Hex8(0xAA)));
}

#[test]
fn test_parse_illegal_opcode_marker() {
    let record = TraceRecord::parse(
        "C6BD  04 A9    *NOP $A9 = 00                    A:AA X:97 Y:4E P:EF SP:F5 CYC:1234",
    )
    .unwrap();

    assert_eq!(record.instruction_bytes, "04 A9");
    assert_eq!(record.disassembly, "*NOP $A9 = 00");
}

#[test]
fn test_parse_collapses_disassembly_whitespace() {
    let record = TraceRecord::parse(
        "C000  4C F5 C5  JMP     $C5F5     A:00 X:00 Y:00 P:24 SP:FD CYC:7",
    )
    .unwrap();

    assert_eq!(record.disassembly, "JMP $C5F5");
}

#[test]
fn test_parse_missing_markers_are_unknown() {
    let record = TraceRecord::parse("C000  4C F5 C5  JMP $C5F5   A:00 X:00").unwrap();

    assert_eq!(record.accumulator, Field::Parsed(Hex8(0x00)));
    assert_eq!(record.x_register, Field::Parsed(Hex8(0x00)));
    assert!(record.y_register.is_unknown());
    assert!(record.status_flags.is_unknown());
    assert!(record.stack_pointer.is_unknown());
    assert!(record.cycle_count.is_unknown());
    assert_eq!(record.y_register.to_string(), "??");
    assert_eq!(record.cycle_count.to_string(), "?");
}

#[test]
fn test_status_flags_not_taken_from_stack_pointer() {
    let record = TraceRecord::parse("C000  4C F5 C5  JMP $C5F5   A:00 X:00 Y:00 SP:FD").unwrap();

    assert!(record.status_flags.is_unknown());
    assert_eq!(record.stack_pointer, Field::Parsed(Hex8(0xFD)));
}

#[test]
fn test_parse_malformed_columns() {
    let record = TraceRecord::parse("garbage").unwrap();

    assert_eq!(record.program_counter, "garb");
    assert_eq!(record.instruction_bytes, "");
    assert_eq!(record.disassembly, "");
    assert!(record.accumulator.is_unknown());
}

#[test]
fn test_parse_empty_line_is_invalid() {
    assert_eq!(TraceRecord::parse(""), Err(RecordError::Empty));
    assert_eq!(TraceRecord::parse("   \t\r\n"), Err(RecordError::Empty));

    let parsed = line("   ");
    assert!(!parsed.is_valid());
    assert_eq!(parsed.error(), Some(&RecordError::Empty));
}

#[test]
fn test_from_bytes_invalid_utf8() {
    let parsed = ParsedLine::from_bytes(b"C000  4C \xFF\xFE  JMP");

    assert!(!parsed.is_valid());
    assert_eq!(
        parsed.error(),
        Some(&RecordError::InvalidUtf8 { valid_up_to: 9 })
    );
    assert!(parsed.raw_text().starts_with("C000  4C"));
}

#[test]
fn test_from_bytes_valid() {
    let parsed = ParsedLine::from_bytes(JMP.as_bytes());
    assert!(parsed.is_valid());
    assert_eq!(parsed.raw_text(), JMP);
}

#[test]
fn test_display_reparses_to_same_fields() {
    let lines = [
        JMP,
        JMP_WITH_PPU,
        "C72F  EA        NOP                             A:00 X:00 Y:00 P:26 SP:FB CYC:35",
        "C5FE  AD 00 02  LDA   $0200 =   00   A:AA X:97 Y:4E P:E5 SP:F9 CYC:301",
        "C000  4C F5 C5  JMP $C5F5   A:00 X:00",
    ];

    for text in lines {
        let record = TraceRecord::parse(text).unwrap();
        let reparsed = TraceRecord::parse(&record.to_string()).unwrap();

        assert_eq!(reparsed.program_counter, record.program_counter, "{text}");
        assert_eq!(reparsed.instruction_bytes, record.instruction_bytes, "{text}");
        assert_eq!(reparsed.disassembly, record.disassembly, "{text}");
        assert_eq!(reparsed.accumulator, record.accumulator, "{text}");
        assert_eq!(reparsed.x_register, record.x_register, "{text}");
        assert_eq!(reparsed.y_register, record.y_register, "{text}");
        assert_eq!(reparsed.status_flags, record.status_flags, "{text}");
        assert_eq!(reparsed.stack_pointer, record.stack_pointer, "{text}");
        assert_eq!(reparsed.cycle_count, record.cycle_count, "{text}");
    }
}

#[test]
fn test_compare_identical() {
    let result = compare(&line(JMP), &line(JMP));
    assert!(result.matches());
    assert!(result.differences.is_empty());
}

#[test]
fn test_compare_accumulator_difference() {
    let candidate = JMP.replace("A:00", "A:01");
    let result = compare(&line(JMP), &line(&candidate));

    assert!(!result.matches());
    assert_eq!(result.differences.len(), 1);
    assert_eq!(result.differences[0].to_string(), "A: 00 != 01");
    assert_eq!(result.differences[0].field(), Some(TraceField::Accumulator));
}

#[test]
fn test_compare_ignores_cycle_count_by_default() {
    let candidate = JMP.replace("CYC:7", "CYC:8");
    assert!(compare(&line(JMP), &line(&candidate)).matches());

    let options = CompareOptions {
        compare_cycles: true,
    };
    let result = compare_with(&line(JMP), &line(&candidate), options);
    assert_eq!(result.differences.len(), 1);
    assert_eq!(result.differences[0].to_string(), "CYC: 7 != 8");
}

#[test]
fn test_compare_reports_in_field_order() {
    let reference =
        "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7";
    let candidate =
        "C001  4C F5 C6  JMP $C6F5                       A:00 X:00 Y:00 P:25 SP:FC CYC:9";

    let result = compare(&line(reference), &line(candidate));
    let rendered: Vec<String> = result.differences.iter().map(ToString::to_string).collect();

    assert_eq!(
        rendered,
        vec![
            "PC: C000 != C001",
            "Bytes: 4C F5 C5 != 4C F5 C6",
            "Disasm: 'JMP $C5F5' != 'JMP $C6F5'",
            "P: 24 != 25",
            "SP: FD != FC",
        ]
    );
}

#[test]
fn test_compare_unknown_against_parsed() {
    let candidate = "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 CYC:7";
    let result = compare(&line(JMP), &line(candidate));

    assert_eq!(result.differences.len(), 1);
    assert_eq!(result.differences[0].to_string(), "SP: FD != ??");
}

#[test]
fn test_compare_renormalizes_hand_built_disassembly() {
    let reference = line(JMP);
    let mut record = TraceRecord::parse(JMP).unwrap();
    record.disassembly = "  JMP   $C5F5 ".to_string();

    assert!(compare(&reference, &ParsedLine::Valid(record)).matches());
}

#[test]
fn test_compare_invalid_state() {
    let result = compare(&line(JMP), &line(""));
    assert_eq!(result.differences, vec![Difference::InvalidState]);
    assert_eq!(result.differences[0].to_string(), "Invalid state");

    let result = compare(&line(""), &line(JMP));
    assert_eq!(result.differences, vec![Difference::InvalidState]);
}
