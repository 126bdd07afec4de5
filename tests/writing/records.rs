#[cfg(test)]
mod verify {
    use fwrite::error::WriteError;
    use fwrite::format::{Descriptor, Format};
    use fwrite::writing::{IoFlags, Session, Sink, CRLF};

    fn internal(format: &str, values: &[i64]) -> String {
        let mut text = String::new();
        {
            let mut session = Session::compile(&mut text, format).unwrap();
            session.write(values);
        }
        text
    }

    fn stream(format: Format, flags: &mut IoFlags, values: &[i64]) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut session = Session::new(Sink::stream(&mut buffer), format).with_flags(flags);
            session.write(values);
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn wraps_once_per_exhausted_pass() {
        for n in 1..=7i64 {
            let values: Vec<i64> = (1..=n).collect();
            let mut text = String::new();
            let mut session = Session::compile(&mut text, "(I2, ',', I2)").unwrap();
            session.write(&values);

            let expected = (n as usize - 1) / 2;
            assert_eq!(session.reverts(), expected);
            assert_eq!(
                session
                    .format()
                    .reverts(),
                expected
            );
        }
    }

    #[test]
    fn literals_fire_once_per_pass() {
        assert_eq!(internal("(I2, ',', I2)", &[1, 2, 3, 4, 5]), " 1, 2\n 3, 4\n 5,");
        assert_eq!(internal("('x=', I2)", &[1, 2, 3]), "x= 1\nx= 2\nx= 3");
    }

    #[test]
    fn reversion_returns_to_last_group() {
        let format = Format::parse("('head', 2(I2))").unwrap();
        let mut flags = IoFlags::new();
        assert_eq!(stream(format, &mut flags, &[1, 2, 3, 4]), "head 1 2\n 3 4\n");
    }

    #[test]
    fn colon_stops_when_values_run_out() {
        assert_eq!(internal("(I2, :, ',', I2, :, ',', I2)", &[1, 2]), " 1, 2");
        assert_eq!(internal("(I2, ',', I2, ',', I2)", &[1, 2]), " 1, 2,");
        assert_eq!(internal("(I2, :, ',')", &[1, 2, 3]), " 1,\n 2,\n 3");
    }

    #[test]
    fn trailing_literals_flushed_at_end() {
        let format = Format::parse("('X=', I1, '!', 'Y=', I1)").unwrap();
        let mut flags = IoFlags::new();
        assert_eq!(stream(format, &mut flags, &[1]), "X=1!Y=\n");
    }

    #[test]
    fn literal_value_literal_over_two_passes() {
        let format = Format::new(vec![
            Descriptor::literal("X="),
            Descriptor::Integer {
                width: 1,
                digits: None,
            },
            Descriptor::literal(";"),
        ]);
        let mut flags = IoFlags::new();
        assert_eq!(stream(format, &mut flags, &[1, 2]), "X=1;\nX=2;\n");
    }

    #[test]
    fn advancing_record_always_terminated_once() {
        let mut flags = IoFlags::new();
        assert_eq!(stream(Format::parse("('hello')").unwrap(), &mut flags, &[]), "hello\n");
        assert_eq!(stream(Format::parse("('a', /, 'b')").unwrap(), &mut flags, &[]), "a\nb\n");
        assert_eq!(stream(Format::parse("(I3, 4X)").unwrap(), &mut flags, &[7]), "  7\n");
        assert!(flags.ok());
    }

    #[test]
    fn non_advancing_tracks_virtual_position() {
        let mut buffer: Vec<u8> = Vec::new();
        let mut flags = IoFlags::new().non_advancing(true);
        {
            let mut session = Session::compile(Sink::stream(&mut buffer), "(A6, TL4, I2)")
                .unwrap()
                .with_flags(&mut flags);

            session.write("abcdef");
            assert_eq!(session.pos(), 2);

            // the field lands inside text already written
            session.write(&42);
            assert_eq!(session.pos(), 4);
            assert_eq!(session.pending(), "ab42ef");
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), "ab42ef");
        assert!(flags.ok());

        let mut flags = IoFlags::new().non_advancing(true);
        assert_eq!(stream(Format::parse("(I5)").unwrap(), &mut flags, &[42]), "   42");
        assert_eq!(stream(Format::parse("(I3, 4X)").unwrap(), &mut flags, &[7]), "  7    ");
    }

    #[test]
    fn format_marked_non_advancing() {
        let mut format = Format::parse("(I2)").unwrap();
        format.set_non_advancing(true);

        let mut flags = IoFlags::new();
        assert_eq!(stream(format, &mut flags, &[7]), " 7");
    }

    #[test]
    fn tabs_count_from_the_current_line() {
        let mut flags = IoFlags::new();
        let format = Format::parse("(I1, /, T3, I1)").unwrap();
        assert_eq!(stream(format, &mut flags, &[1, 2]), "1\n  2\n");
    }

    #[test]
    fn terminator_resolution() {
        let mut flags = IoFlags::new().terminator(CRLF);
        assert_eq!(stream(Format::parse("(I1)").unwrap(), &mut flags, &[1, 2]), "1\r\n2\r\n");

        // an explicit terminator beats the one in the flags
        let mut buffer: Vec<u8> = Vec::new();
        let mut flags = IoFlags::new().terminator(CRLF);
        {
            let mut session = Session::compile(Sink::stream(&mut buffer), "(I1)")
                .unwrap()
                .with_terminator("|")
                .with_flags(&mut flags);
            session.write(&[1, 2]);
            assert_eq!(session.terminator(), "|");
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), "1|2|");

        // internal targets ignore the flags' terminator
        let mut text = String::new();
        let mut flags = IoFlags::new().terminator(CRLF);
        {
            let mut session = Session::compile(&mut text, "(I1)")
                .unwrap()
                .with_flags(&mut flags);
            session.write(&[1, 2]);
        }
        assert_eq!(text, "1\n2");
    }

    #[test]
    fn format_without_value_descriptor() {
        let mut text = String::new();
        let mut session = Session::compile(&mut text, "('hello')").unwrap();
        session.write(&1);

        assert!(!session.is_good());
        assert_eq!(session.finish(), Err(WriteError::Exhausted));
        assert_eq!(text, "hello");
    }

    #[test]
    fn failure_makes_later_pushes_inert() {
        let mut buffer: Vec<u8> = Vec::new();
        let mut flags = IoFlags::new();
        {
            let mut session = Session::compile(Sink::stream(&mut buffer), "(I3, I3, I3)")
                .unwrap()
                .with_flags(&mut flags);
            session
                .write(&1)
                .write("x")
                .write(&3);
            assert_eq!(session.pending(), "  1");
        }

        // no terminator after a failure
        assert_eq!(String::from_utf8(buffer).unwrap(), "  1");
        assert!(flags.err());
        assert_eq!(flags.ios(), 2);
        assert_eq!(
            flags.error(),
            Some(&WriteError::Unsupported {
                descriptor: "I3".to_string(),
                value: "text",
            })
        );
    }

    #[test]
    fn list_directed_items() {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut session = Session::new(Sink::stream(&mut buffer), Format::list_directed());
            session
                .write(&1)
                .write(&2.5)
                .write("abc")
                .write(&true);
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), "1 2.5 abc T\n");
    }

    #[test]
    fn list_directed_extreme_reals() {
        let mut text = String::new();
        {
            let mut session = Session::new(&mut text, Format::list_directed());
            session
                .write(&1e20)
                .write(&1e-7);
        }
        assert_eq!(text, "1.0E+20 1.0E-07");
    }

    #[test]
    fn flags_cleared_when_attached() {
        let mut flags = IoFlags::new();
        flags.set_status(Some(&WriteError::Exhausted));
        assert!(flags.err());

        assert_eq!(stream(Format::parse("(I2)").unwrap(), &mut flags, &[5]), " 5\n");
        assert!(flags.ok());
        assert_eq!(flags.ios(), 0);
    }
}
