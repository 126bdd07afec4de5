#[cfg(test)]
mod verify {
    use std::error::Error;
    use std::io;

    use fwrite::error::WriteError;
    use fwrite::format::{Descriptor, Format};
    use fwrite::writing::{FixedString, IoFlags, Session, Sink};

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn text_target_is_replaced() {
        let mut text = String::from("previous contents");
        {
            let mut session = Session::compile(&mut text, "(A, I3)").unwrap();
            session
                .write("ab")
                .write(&5);
        }
        assert_eq!(text, "ab  5");
    }

    #[test]
    fn fixed_target_padded_and_truncated() {
        let mut fixed = FixedString::new(8);
        {
            let mut session = Session::compile(&mut fixed, "(A, I3)").unwrap();
            session
                .write("ab")
                .write(&5);
        }
        assert_eq!(fixed.as_str(), "ab  5   ");
        assert_eq!(fixed.trimmed(), "ab  5");

        let mut fixed = FixedString::new(3);
        {
            let mut session = Session::compile(&mut fixed, "(I5)").unwrap();
            session.write(&12345);
        }
        assert_eq!(fixed.as_str(), "123");
    }

    #[test]
    fn stream_failure_reported_at_commit() {
        let mut broken = Broken;
        let mut flags = IoFlags::new();
        {
            let mut session = Session::compile(Sink::stream(&mut broken), "(I2)")
                .unwrap()
                .with_flags(&mut flags);
            session.write(&1);

            // nothing touches the stream before the end
            assert!(session.is_good());
        }

        assert_eq!(flags.error(), Some(&WriteError::Sink("disk full".to_string())));
        assert_eq!(flags.ios(), 1);

        let mut broken = Broken;
        let session = Session::compile(Sink::stream(&mut broken), "(I2)").unwrap();
        assert!(session
            .finish()
            .is_err());
    }

    #[test]
    fn borrowed_format_reset_between_sessions() {
        let spec = "('v=', I2, :, ';')";
        let mut format = Format::parse(spec).unwrap();

        let mut first = String::new();
        {
            let mut session = Session::new(&mut first, &mut format);
            session.write(&[1, 2, 3]);
            assert_eq!(
                session
                    .format()
                    .reverts(),
                2
            );
        }
        assert_eq!(first, "v= 1;\nv= 2;\nv= 3");
        assert_eq!(format.reverts(), 0);
        assert_eq!(format.current(), Some(&Descriptor::literal("v=")));

        let mut second = String::new();
        {
            let mut session = Session::new(&mut second, &mut format);
            session.write(&[4, 5]);
        }

        let mut fresh = String::new();
        {
            let mut session = Session::compile(&mut fresh, spec).unwrap();
            session.write(&[4, 5]);
        }

        assert_eq!(second, fresh);
        assert_eq!(second, "v= 4;\nv= 5");
    }

    #[test]
    fn borrowed_format_reset_after_failure() {
        let mut format = Format::parse("(I2, I2)").unwrap();

        let mut text = String::new();
        let mut session = Session::new(&mut text, &mut format);
        session
            .write(&1)
            .write("x");
        assert!(session
            .finish()
            .is_err());

        assert_eq!(format.reverts(), 0);
        assert!(!format.is_exhausted());
        assert_eq!(text, " 1");
    }

    #[test]
    fn flags_do_not_change_borrowed_format() {
        let mut format = Format::parse("(I2)").unwrap();
        let mut flags = IoFlags::new().non_advancing(true);

        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut session =
                Session::new(Sink::stream(&mut buffer), &mut format).with_flags(&mut flags);
            assert!(session.is_non_advancing());
            session.write(&7);
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), " 7");
        assert!(!format.is_non_advancing());

        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut session = Session::new(Sink::stream(&mut buffer), &mut format);
            session.write(&7);
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), " 7\n");
    }

    fn emit(text: &mut String, values: &[&str]) -> Result<(), Box<dyn Error>> {
        let mut session = Session::compile(text, "(3I3)")?;
        for value in values {
            let value: i64 = value.parse()?;
            session.write(&value);
        }
        Ok(())
    }

    #[test]
    fn early_return_still_commits() {
        let mut text = String::new();
        assert!(emit(&mut text, &["1", "2", "x", "4"]).is_err());
        assert_eq!(text, "  1  2");

        let mut text = String::new();
        assert!(emit(&mut text, &["1", "2", "3"]).is_ok());
        assert_eq!(text, "  1  2  3");
    }
}
