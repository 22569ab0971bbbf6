mod setup;
use setup::*;
use texmml::{
    Document, Settings,
    mathml_tree::{MathNodeType, TexClass},
    types::{ErrorMode, TagMode},
};

#[test]
fn a_parser() {
    it("should not fail on an empty string", || {
        expect!("").to_parse(&inline_settings())
    });

    it("should ignore whitespace", || {
        expect!("    x    y    ").to_parse_like("xy", &inline_settings())
    });

    it("should wrap the result in a math element", || {
        let tree = get_built("x")?;
        assert!(tree.is(MathNodeType::Math));
        assert_eq!(tree.attribute("display"), None);
        let tree = get_built_with("x", &display_settings())?;
        assert_eq!(tree.attribute("display"), Some("block"));
        Ok(())
    });

    it("should dissolve the top-level row into the math element", || {
        let tree = get_built("x+1")?;
        let kinds: Vec<_> = tree.child_nodes().map(|c| c.node_type).collect();
        assert_eq!(
            kinds,
            [MathNodeType::Mi, MathNodeType::Mo, MathNodeType::Mn]
        );
        Ok(())
    });

    it("should reject an undefined control sequence", || {
        expect!(r"\foo").to_fail_with("UndefinedControlSequence", &inline_settings())
    });
}

#[test]
fn a_group_parser() {
    it("should fail on an unbalanced close", || {
        expect!("x}").to_fail_with("ExtraCloseMissingOpen", &inline_settings())
    });

    it("should fail on an unclosed open", || {
        expect!("{x").to_fail_with("ExtraOpenMissingClose", &inline_settings())
    });

    it("should match \\left with \\right", || {
        expect!(r"\left(x\right)").to_parse(&inline_settings())?;
        expect!(r"x\right)").to_fail_with("MissingLeftExtraRight", &inline_settings())?;
        expect!(r"\left(x").to_fail_with("ExtraLeftMissingRight", &inline_settings())
    });

    it("should negate the relation after \\not", || {
        let tree = get_built(r"a\not=b")?;
        assert_eq!(find(&tree, MathNodeType::Mo).expect("mo").text, "\u{2260}");
        expect!(r"{a}\not{=}").to_parse(&inline_settings())
    });
}

#[test]
fn a_script_parser() {
    it("should reject a double superscript", || {
        expect!("x^2^3").to_fail_with("DoubleExponent", &inline_settings())
    });

    it("should reject a double subscript", || {
        expect!("x_2_3").to_fail_with("DoubleSubscripts", &inline_settings())
    });

    it("should nest braced scripts", || {
        let tree = get_built("x^{2^3}")?;
        assert_eq!(find_all(&tree, MathNodeType::Msup).len(), 2);
        Ok(())
    });

    it("should combine a subscript and a superscript", || {
        let tree = get_built("x_1^2")?;
        let msubsup = find(&tree, MathNodeType::Msubsup).expect("msubsup");
        assert_eq!(msubsup.children.len(), 3);
        assert_eq!(msubsup.child(0).unwrap().text, "x");
        Ok(())
    });

    it("should fail on a missing script", || {
        expect!("x^").to_fail_with("MissingScript", &inline_settings())
    });
}

#[test]
fn a_prime_parser() {
    it("should build a single prime superscript", || {
        let tree = get_built("x'")?;
        let msup = find(&tree, MathNodeType::Msup).expect("msup");
        assert_eq!(msup.child(0).unwrap().text, "x");
        assert_eq!(msup.child(1).unwrap().text, "\u{2032}");
        Ok(())
    });

    it("should use the double prime glyph", || {
        let tree = get_built("x''")?;
        let msup = find(&tree, MathNodeType::Msup).expect("msup");
        assert_eq!(msup.child(1).unwrap().text, "\u{2033}");
        Ok(())
    });

    it("should accept a braced prime with a different shape", || {
        let braced = get_built("x^{'}")?;
        let plain = get_built("x'")?;
        assert_ne!(braced, plain);
        let primes: Vec<_> = find_all(&braced, MathNodeType::Mo)
            .into_iter()
            .filter(|mo| mo.text == "\u{2032}")
            .collect();
        assert_eq!(primes.len(), 1);
        Ok(())
    });

    it("should reject a prime after a superscript", || {
        expect!("x^2'").to_fail_with("DoubleExponentPrime", &inline_settings())
    });
}

#[test]
fn a_macro_expander() {
    it("should stop a self-invoking macro", || {
        expect!(r"\def\x{\x}\x").to_fail_with("MaxMacroSub1", &inline_settings())
    });

    it("should allow exactly the configured number of substitutions", || {
        let settings = Settings::builder().max_macros(3).build();
        expect!(r"\def\a{b}\a\a\a").to_parse(&settings)?;
        expect!(r"\def\a{b}\a\a\a\a").to_fail_with("MaxMacroSub1", &settings)
    });

    it("should expand built-in text macros", || {
        expect!(r"\pmod{p}").to_parse(&inline_settings())?;
        expect!(r"\dfrac{a}{b}").to_parse(&inline_settings())
    });

    it("should use preloaded macros", || {
        let settings = Settings::builder()
            .macros(vec![(
                "RR".to_owned(),
                texmml::macros::MacroDefinition::new(r"\mathbb{R}", 0),
            )])
            .build();
        expect!(r"\RR").to_parse_like(r"\mathbb{R}", &settings)
    });
}

#[test]
fn a_newcommand_parser() {
    it("should define a macro", || {
        expect!(r"\newcommand{\R}{\mathbb{R}}\R").to_parse_like(r"\mathbb{R}", &inline_settings())
    });

    it("should substitute parameters and defaults", || {
        expect!(r"\newcommand\f[2][x]{#1+#2}\f{y}").to_parse_like("x+y", &inline_settings())?;
        expect!(r"\newcommand\f[2][x]{#1+#2}\f[z]{y}").to_parse_like("z+y", &inline_settings())
    });

    it("should validate the name and the parameter count", || {
        expect!(r"\newcommand{\a b}{x}")
            .to_fail_with("IllegalControlSequenceName", &inline_settings())?;
        expect!(r"\newcommand{\a}[x]{y}").to_fail_with("IllegalParamNumber", &inline_settings())
    });

    it("should read \\def parameters", || {
        expect!(r"\def\g#1#2{#2#1}\g ab").to_parse_like("ba", &inline_settings())?;
        expect!(r"\def\g#2{x}").to_fail_with("IllegalParamNumber", &inline_settings())?;
        expect!(r"\def g{x}").to_fail_with("MissingCS", &inline_settings())
    });

    it("should copy meanings with \\let", || {
        expect!(r"\let\x=\alpha \x").to_parse_like(r"\alpha", &inline_settings())?;
        expect!(r"\let\x a\x").to_parse_like("a", &inline_settings())?;
        expect!(r"\let x").to_fail_with("MissingCS", &inline_settings())
    });

    it("should define environments", || {
        expect!(r"\newenvironment{braced}{\left\{}{\right\}}\begin{braced}x\end{braced}")
            .to_parse_like(r"\left\{x\right\}", &inline_settings())?;
        expect!(r"\newenvironment{pair}[1]{#1(}{)}\begin{pair}{f}x\end{pair}")
            .to_parse_like("f(x)", &inline_settings())
    });

    it("should keep definitions for the rest of the document", || {
        let tree = get_built_in_document(&[r"\newcommand{\R}{x}", r"\R"], &inline_settings())?;
        assert_eq!(find(&tree, MathNodeType::Mi).unwrap().text, "x");
        expect!(r"\R").to_fail_with("UndefinedControlSequence", &inline_settings())
    });

    it("should be unavailable without its package", || {
        let settings = Settings::builder().packages(vec![]).build();
        expect!(r"\newcommand{\R}{x}").to_fail_with("UndefinedControlSequence", &settings)
    });
}

#[test]
fn a_tag_parser() {
    it("should reject a label defined twice", || {
        let settings = ams_tag_settings();
        let result = get_built_in_document(&[r"x\label{a}", r"y\label{a}"], &settings);
        assert_eq!(result.unwrap_err().id(), "MultipleLabel");
        Ok(())
    });

    it("should accept a duplicate label when configured to", || {
        let settings = Settings::builder()
            .display_mode(true)
            .tags(TagMode::Ams)
            .ignore_duplicate_labels(true)
            .build();
        get_built_in_document(&[r"x\label{a}", r"y\label{a}"], &settings).map(|_| ())
    });

    it("should show a placeholder for a forward reference", || {
        let tree = get_built(r"\ref{later}")?;
        let link = find(&tree, MathNodeType::Mrow).expect("link");
        assert_eq!(link.text_content(), "???");
        Ok(())
    });

    it("should number equations and link references", || {
        let tree = get_built_in_document(
            &[r"\begin{equation}E=mc^2\label{mass}\end{equation}", r"\eqref{mass}"],
            &ams_tag_settings(),
        )?;
        let link = find(&tree, MathNodeType::Mrow).expect("link");
        assert_eq!(link.attribute("href"), Some("#eqn%3Amass"));
        assert_eq!(link.text_content(), "(1)");
        Ok(())
    });

    it("should put the tag in a labeled row", || {
        let tree = get_built_with(
            r"\begin{equation}E=mc^2\label{mass}\end{equation}",
            &ams_tag_settings(),
        )?;
        let row = find(&tree, MathNodeType::Mlabeledtr).expect("mlabeledtr");
        let tag = row.child(0).unwrap();
        assert_eq!(tag.attribute("id"), Some("eqn:mass"));
        assert_eq!(tag.text_content(), "(1)");
        Ok(())
    });

    it("should not count a failed expression", || {
        let settings = ams_tag_settings();
        let mut doc = Document::new(settings);
        render_in(&mut doc, r"\begin{equation}a\end{equation}");
        let failed = render_in(&mut doc, r"\begin{equation}b\end{equation}}");
        assert!(find(&failed, MathNodeType::Merror).is_some());
        let tree = render_in(&mut doc, r"\begin{equation}c\end{equation}");
        let row = find(&tree, MathNodeType::Mlabeledtr).expect("mlabeledtr");
        assert_eq!(row.child(0).unwrap().text_content(), "(2)");
        Ok(())
    });

    it("should reject two tags on one equation", || {
        expect!(r"x\tag{1}\tag{2}").to_fail_with("MultipleCommand", &ams_tag_settings())?;
        expect!(r"x\notag\tag{2}").to_parse(&ams_tag_settings())
    });
}

#[test]
fn an_array_parser() {
    it("should frame a column spec with outer bars", || {
        let tree = get_built(r"\begin{array}{|c|}a\end{array}")?;
        let frame = find(&tree, MathNodeType::Menclose).expect("menclose");
        assert_eq!(frame.attribute("notation"), Some("left right"));
        assert_eq!(frame.attribute("data-frame-styles"), Some("solid solid"));
        Ok(())
    });

    it("should draw a dashed interior line", || {
        let tree = get_built(r"\begin{array}{c:c}a&b\end{array}")?;
        assert!(find(&tree, MathNodeType::Menclose).is_none());
        let table = find(&tree, MathNodeType::Mtable).expect("mtable");
        assert_eq!(table.attribute("columnlines"), Some("dashed"));
        assert_eq!(table.attribute("frame"), None);
        Ok(())
    });

    it("should check environment names", || {
        expect!(r"\begin{equation}x\end{align}").to_fail_with("EnvBadEnd", &display_settings())?;
        expect!(r"x\end{equation}").to_fail_with("MissingBeginExtraEnd", &display_settings())?;
        expect!(r"\begin{foo}x\end{foo}").to_fail_with("UnknownEnv", &display_settings())
    });

    it("should reject & outside of an array", || {
        expect!("a&b").to_fail_with("Misplaced", &inline_settings())
    });

    it("should only shove lines inside multline", || {
        expect!(r"\shoveleft x").to_fail_with("Misplaced", &inline_settings())?;
        expect!(r"\begin{align}\shoveleft x\end{align}")
            .to_fail_with("CommandNotAllowedInEnv", &display_settings())?;
        expect!(r"\begin{multline}a\\\shoveleft b\\c\end{multline}").to_parse(&display_settings())
    });

    it("should leave out an empty column alignment", || {
        let tree = get_built(r"\begin{array}{}a\end{array}")?;
        let table = find(&tree, MathNodeType::Mtable).expect("mtable");
        assert_eq!(table.attribute("columnalign"), None);
        Ok(())
    });
}

#[test]
fn a_fraction_and_root_builder() {
    it("should build a two-child fraction", || {
        let tree = get_built(r"\frac{a}{b}")?;
        let frac = find(&tree, MathNodeType::Mfrac).expect("mfrac");
        assert_eq!(frac.children.len(), 2);
        assert_eq!(frac.child(0).unwrap().text, "a");
        assert_eq!(frac.child(1).unwrap().text, "b");
        Ok(())
    });

    it("should build a root with its degree", || {
        let tree = get_built(r"\sqrt[n]{x}")?;
        let root = find(&tree, MathNodeType::Mroot).expect("mroot");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child(0).unwrap().text, "x");
        let degree = root.child(1).unwrap();
        assert!(degree.is(MathNodeType::Mstyle));
        assert_eq!(degree.attribute("scriptlevel"), Some("+1"));
        assert_eq!(degree.text_content(), "n");
        Ok(())
    });

    it("should move the degree inside its script level", || {
        let tree = get_built(r"\sqrt[\uproot{3}n]{x}")?;
        let degree = find(&tree, MathNodeType::Mroot).expect("mroot").child(1).unwrap();
        assert!(degree.is(MathNodeType::Mstyle));
        let padded = degree.child(0).unwrap();
        assert!(padded.is(MathNodeType::Mpadded));
        assert_eq!(padded.attribute("voffset"), Some("+0.2em"));
        Ok(())
    });

    it("should read \\root ... \\of", || {
        expect!(r"\root n \of x").to_parse_like(r"\sqrt[n]{x}", &inline_settings())
    });

    it("should only move a root degree inside the degree", || {
        expect!(r"\sqrt[\leftroot{2}n]{x}").to_parse(&inline_settings())?;
        expect!(r"\leftroot{2}x").to_fail_with("MisplacedMoveRoot", &inline_settings())
    });

    it("should reject two infix fractions in one group", || {
        expect!(r"a \over b \over c").to_fail_with("AmbiguousUseOf", &inline_settings())
    });
}

#[test]
fn a_symbol_parser() {
    it("should set capital Greek upright", || {
        let tree = get_built(r"\Gamma")?;
        let mi = find(&tree, MathNodeType::Mi).expect("mi");
        assert_eq!(mi.text, "\u{393}");
        assert_eq!(mi.attribute("mathvariant"), Some("normal"));
        Ok(())
    });

    it("should follow the current font", || {
        let tree = get_built(r"\mathbf{\Gamma}")?;
        let mi = find(&tree, MathNodeType::Mi).expect("mi");
        assert_eq!(mi.attribute("mathvariant"), Some("bold"));
        Ok(())
    });
}

#[test]
fn a_color_parser() {
    it("should convert model values to a color", || {
        let tree = get_built(r"\color[rgb]{1,0,0}x")?;
        let style = find(&tree, MathNodeType::Mstyle).expect("mstyle");
        assert_eq!(style.attribute("mathcolor"), Some("#FF0000"));
        Ok(())
    });

    it("should check the number of components", || {
        expect!(r"\color[rgb]{1,0}x").to_fail_with("ModelArg1", &inline_settings())
    });

    it("should check the component range", || {
        expect!(r"\color[rgb]{2,0,0}x").to_fail_with("ModelArg2", &inline_settings())?;
        expect!(r"\color[RGB]{256,0,0}x").to_fail_with("ModelArg2", &inline_settings())
    });

    it("should reject unknown models and bad HTML colors", || {
        expect!(r"\color[cmyk]{0,0,0,1}x").to_fail_with("InvalidModel", &inline_settings())?;
        expect!(r"\textcolor[HTML]{GG0000}{x}").to_fail_with("InvalidHTMLColor", &inline_settings())
    });
}

#[test]
fn a_class_assigner() {
    it("should give the root the class of its embellished core", || {
        let tree = get_built(r"\sum_{i=1}^n")?;
        assert_eq!(tree.tex_class, Some(TexClass::Op));
        let tree = get_built("x+y")?;
        assert_eq!(tree.tex_class, Some(TexClass::Ord));
        Ok(())
    });

    it("should demote a leading binary operator", || {
        let tree = get_built("+x")?;
        let plus = find(&tree, MathNodeType::Mo).unwrap();
        assert_eq!(plus.tex_class, Some(TexClass::Ord));
        let tree = get_built("a+x")?;
        let plus = find(&tree, MathNodeType::Mo).unwrap();
        assert_eq!(plus.tex_class, Some(TexClass::Bin));
        Ok(())
    });
}

#[test]
fn a_named_function_parser() {
    it("should keep the name as the base of a script", || {
        let tree = get_built(r"\sin^2 x")?;
        let kinds: Vec<_> = tree.child_nodes().map(|c| c.node_type).collect();
        assert_eq!(
            kinds,
            [MathNodeType::Msup, MathNodeType::Mo, MathNodeType::Mi]
        );
        let msup = tree.child(0).unwrap();
        assert_eq!(msup.child(0).unwrap().text, "sin");
        assert_eq!(tree.child(1).unwrap().text, "\u{2061}");
        Ok(())
    });

    it("should not apply a function to a relation", || {
        let tree = get_built(r"\sin = 0")?;
        assert!(
            find_all(&tree, MathNodeType::Mo)
                .iter()
                .all(|mo| mo.text != "\u{2061}")
        );
        Ok(())
    });

    it("should build operator names", || {
        let tree = get_built(r"\operatorname{sn} x")?;
        assert_eq!(find(&tree, MathNodeType::Mi).unwrap().text, "sn");
        Ok(())
    });
}

#[test]
fn a_token_builder() {
    it("should build a token with attributes", || {
        let tree = get_built(r#"\mmlToken{mo}[stretchy="false"]{|}"#)?;
        let mo = find(&tree, MathNodeType::Mo).expect("mo");
        assert_eq!(mo.attribute("stretchy"), Some("false"));
        Ok(())
    });

    it("should reject containers", || {
        expect!(r"\mmlToken{mrow}{x}").to_fail_with("NotMathMLToken", &inline_settings())
    });
}

#[test]
fn an_error_renderer() {
    it("should show the message in strict mode", || {
        let mut doc = Document::default();
        let tree = render_in(&mut doc, "x}");
        let merror = find(&tree, MathNodeType::Merror).expect("merror");
        assert_eq!(merror.attribute("data-error"), Some("ExtraCloseMissingOpen"));
        assert_ne!(merror.text_content(), "x}");
        Ok(())
    });

    it("should echo the source in verbatim mode", || {
        let settings = Settings::builder().error_mode(ErrorMode::Verbatim).build();
        let mut doc = Document::new(settings);
        let tree = render_in(&mut doc, "x}");
        let merror = find(&tree, MathNodeType::Merror).expect("merror");
        assert_eq!(merror.text_content(), "x}");
        Ok(())
    });
}
